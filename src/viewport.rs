use std::ops::Range;

use thiserror::Error;
use tracing::warn;

use crate::GridSize;
use crate::grid::Grid;

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("Offset ({x}, {y}) is out of range, the largest valid offset is ({max_x}, {max_y})")]
    OffsetOutOfRange {
        x: GridSize,
        y: GridSize,
        max_x: GridSize,
        max_y: GridSize,
    },

    #[error("Pixel ({pixel_x}, {pixel_y}) is not over the grid")]
    PixelOutside { pixel_x: f64, pixel_y: f64 },
}

/// Maps surface pixels onto grid cells.
///
/// The offset is the grid coordinate of the top-left visible cell. It is kept small enough that the
/// visible window never reaches past the grid.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// `x` offset into the grid
    x: GridSize,

    /// `y` offset into the grid
    y: GridSize,

    /// Number of cells the surface can show horizontally
    visible_width: GridSize,

    /// Number of cells the surface can show vertically
    visible_height: GridSize,

    /// Size of one cell, in logical pixels
    cell_size: f64,
}

impl Viewport {
    pub fn new(visible_width: GridSize, visible_height: GridSize, cell_size: f64) -> Self {
        Self {
            x: 0,
            y: 0,
            visible_width: visible_width.max(1),
            visible_height: visible_height.max(1),
            cell_size,
        }
    }

    pub fn offset(&self) -> (GridSize, GridSize) {
        (self.x, self.y)
    }

    pub fn visible_size(&self) -> (GridSize, GridSize) {
        (self.visible_width, self.visible_height)
    }

    /// The largest offset that keeps the visible window inside `grid`
    pub fn max_offset(&self, grid: &Grid) -> (GridSize, GridSize) {
        let w = self.visible_width.min(grid.width());
        let h = self.visible_height.min(grid.height());

        (grid.width() - w, grid.height() - h)
    }

    /// Move the window. An offset that would expose cells past the grid is rejected and the current
    /// offset is kept.
    pub fn set_offset(&mut self, x: GridSize, y: GridSize, grid: &Grid) -> Result<(), ViewportError> {
        let (max_x, max_y) = self.max_offset(grid);

        if x > max_x || y > max_y {
            warn!(x, y, max_x, max_y, "rejected viewport offset");

            return Err(ViewportError::OffsetOutOfRange { x, y, max_x, max_y });
        }

        self.x = x;
        self.y = y;

        Ok(())
    }

    /// Move the window by `(dx, dy)`, stopping at the grid edges
    pub fn pan(&mut self, dx: isize, dy: isize, grid: &Grid) {
        let (max_x, max_y) = self.max_offset(grid);

        self.x = self.x.saturating_add_signed(dx).min(max_x);
        self.y = self.y.saturating_add_signed(dy).min(max_y);
    }

    /// The surface changed size
    pub fn set_visible_size(&mut self, width: GridSize, height: GridSize, grid: &Grid) {
        self.visible_width = width.max(1);
        self.visible_height = height.max(1);
        self.clamp(grid);
    }

    /// Pull the offset back inside `grid`, e.g. after it shrank
    pub fn clamp(&mut self, grid: &Grid) {
        let (max_x, max_y) = self.max_offset(grid);

        self.x = self.x.min(max_x);
        self.y = self.y.min(max_y);
    }

    /// Grid columns and rows currently on screen
    pub fn window(&self, grid: &Grid) -> (Range<GridSize>, Range<GridSize>) {
        let xs = self.x..(self.x + self.visible_width).min(grid.width());
        let ys = self.y..(self.y + self.visible_height).min(grid.height());

        (xs, ys)
    }

    /// Convert a position on the surface to a grid coordinate.
    ///
    /// `canvas_scale` is the ratio between the surface's physical and logical pixel sizes. Returns
    /// `None` for positions left of or above the surface, and for ones too far away to address.
    pub fn to_grid_coords(
        &self,
        pixel_x: f64,
        pixel_y: f64,
        canvas_scale: f64,
    ) -> Option<(GridSize, GridSize)> {
        let gx = (pixel_x * canvas_scale / self.cell_size).floor();
        let gy = (pixel_y * canvas_scale / self.cell_size).floor();

        if !gx.is_finite() || !gy.is_finite() || gx < 0.0 || gy < 0.0 {
            return None;
        }

        // Huge pixels saturate to `usize::MAX`
        let x = (gx as GridSize).checked_add(self.x)?;
        let y = (gy as GridSize).checked_add(self.y)?;

        Some((x, y))
    }
}
