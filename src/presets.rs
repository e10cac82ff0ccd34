use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::GridSize;
use crate::cell::Cell;
use crate::grid::Grid;
use crate::grid::GridError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown preset \"{name}\"")]
    UnknownPreset { name: String },

    #[error("{preset} needs a {width}x{height} grid")]
    DoesNotFit {
        preset: Preset,
        width: GridSize,
        height: GridSize,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A named starting pattern.
///
/// Patterns are written as rows of text, `O` for a live cell and `.` for a dead one. Row `r`,
/// column `c` lands on grid cell `(x + c, y + r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Glider,
    Blinker,
    Beacon,
    GliderGun,
}

const GLIDER: &[&str] = &[
    ".O.", //
    "..O",
    "OOO",
];

const BLINKER: &[&str] = &["OOO"];

const BEACON: &[&str] = &[
    "OO..", //
    "OO..",
    "..OO",
    "..OO",
];

/// Gosper glider gun
const GLIDER_GUN: &[&str] = &[
    "........................O...........",
    "......................O.O...........",
    "............OO......OO............OO",
    "...........O...O....OO............OO",
    "OO........O.....O...OO..............",
    "OO........O...O.OO....O.O...........",
    "..........O.....O.......O...........",
    "...........O...O....................",
    "............OO......................",
];

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Glider,
        Preset::Blinker,
        Preset::Beacon,
        Preset::GliderGun,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Glider => "Glider",
            Preset::Blinker => "Blinker",
            Preset::Beacon => "Beacon",
            Preset::GliderGun => "Glider Gun",
        }
    }

    pub fn rows(self) -> &'static [&'static str] {
        match self {
            Preset::Glider => GLIDER,
            Preset::Blinker => BLINKER,
            Preset::Beacon => BEACON,
            Preset::GliderGun => GLIDER_GUN,
        }
    }

    pub fn width(self) -> GridSize {
        self.rows().iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn height(self) -> GridSize {
        self.rows().len()
    }

    /// Live cells, relative to the pattern's top-left corner
    pub fn cells(self) -> impl Iterator<Item = (GridSize, GridSize)> {
        self.rows().iter().enumerate().flat_map(|(r, row)| {
            row.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'O')
                .map(move |(c, _)| (c, r))
        })
    }

    /// Offset that centers the pattern on `grid`
    pub fn centered_offset(self, grid: &Grid) -> Result<(GridSize, GridSize), PresetError> {
        let (w, h) = (self.width(), self.height());

        if w > grid.width() || h > grid.height() {
            return Err(PresetError::DoesNotFit {
                preset: self,
                width: w,
                height: h,
            });
        }

        Ok(((grid.width() - w) / 2, (grid.height() - h) / 2))
    }

    /// Write the pattern's live cells into `grid` at `(x, y)`. Dead pattern cells are left as they
    /// are.
    pub fn place(self, grid: &mut Grid, x: GridSize, y: GridSize) -> Result<(), PresetError> {
        for (dx, dy) in self.cells() {
            grid.set(x + dx, y + dy, Cell::Alive)?;
        }

        Ok(())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PresetError;

    /// Case and separator insensitive, so `Glider Gun`, `glider-gun` and `gliderGun` are all the
    /// same preset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "glider" => Ok(Preset::Glider),
            "blinker" => Ok(Preset::Blinker),
            "beacon" => Ok(Preset::Beacon),
            "glidergun" | "gosper" | "gospergun" => Ok(Preset::GliderGun),
            _ => Err(PresetError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}
