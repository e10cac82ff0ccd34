use std::fmt;
use std::str::FromStr;

use crossterm::style::Color;
use thiserror::Error;

use crate::GridSize;
use crate::grid::Grid;
use crate::viewport::Viewport;

/// Anything cells can be painted onto.
///
/// Coordinates passed to a surface are relative to its top-left corner, not to the grid.
pub trait Surface {
    /// Size in cells
    fn size(&self) -> (GridSize, GridSize);

    fn clear_surface(&mut self);

    fn draw_cell(&mut self, x: GridSize, y: GridSize, alive: bool);
}

/// Paint the part of `grid` the viewport looks at
pub fn draw<S: Surface>(grid: &Grid, viewport: &Viewport, surface: &mut S) {
    surface.clear_surface();

    let (xs, ys) = viewport.window(grid);
    let (sw, sh) = surface.size();

    for (sx, x) in xs.enumerate().take(sw) {
        for (sy, y) in ys.clone().enumerate().take(sh) {
            if let Ok(cell) = grid.get(x, y) {
                surface.draw_cell(sx, sy, cell.is_alive());
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown theme \"{name}\", expected \"dark\" or \"light\"")]
    UnknownTheme { name: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Light cells on a dark background
    #[default]
    Dark,

    /// Dark cells on a light background
    Light,
}

impl Theme {
    /// `(foreground, background)`
    pub fn colors(self) -> (Color, Color) {
        match self {
            Theme::Dark => (Color::White, Color::Black),
            Theme::Light => (Color::Black, Color::White),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(ThemeError::UnknownTheme {
                name: s.to_string(),
            }),
        }
    }
}
