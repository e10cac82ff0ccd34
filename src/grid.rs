use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::GridSize;
use crate::cell::Cell;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfBounds {
        x: GridSize,
        y: GridSize,
        width: GridSize,
        height: GridSize,
    },

    #[error("Cell values must be 0 or 1, got {value}")]
    InvalidCellValue { value: i64 },

    #[error("Malformed grid data: {reason}")]
    MalformedGridData { reason: String },

    #[error("Grid dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: GridSize, height: GridSize },
}

/// A bounded rectangle of cells.
///
/// Cells are addressed as `(x, y)`, `x` being the column and `y` the row. Storage is outer-indexed
/// by `x`, the same way the persistence format is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    width: GridSize,
    height: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(width: GridSize, height: GridSize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Dead; width * height],
        })
    }

    /// Build a grid from a function of each coordinate, visited with `x` in the outer loop.
    pub fn from_fn<F>(width: GridSize, height: GridSize, mut f: F) -> Result<Self, GridError>
    where
        F: FnMut(GridSize, GridSize) -> Cell,
    {
        let mut grid = Self::new(width, height)?;

        for x in 0..width {
            for y in 0..height {
                let i = grid.xy_from(x, y);
                grid.cells[i] = f(x, y);
            }
        }

        Ok(grid)
    }

    /// A grid of the same dimensions where each cell is `f(x, y, cell)`
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(GridSize, GridSize, Cell) -> Cell,
    {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| f(i / self.height, i % self.height, cell))
            .collect();

        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    pub fn width(&self) -> GridSize {
        self.width
    }

    pub fn height(&self) -> GridSize {
        self.height
    }

    pub fn get(&self, x: GridSize, y: GridSize) -> Result<Cell, GridError> {
        let i = self.index(x, y)?;

        Ok(self.cells[i])
    }

    /// Bounds-checked read with signed coordinates. Anything outside of the stored cells is `None`.
    pub fn cell(&self, x: isize, y: isize) -> Option<Cell> {
        let (Ok(x), Ok(y)) = (GridSize::try_from(x), GridSize::try_from(y)) else {
            return None;
        };

        if x >= self.width || y >= self.height {
            return None;
        }

        self.cells.get(self.xy_from(x, y)).copied()
    }

    pub fn set(&mut self, x: GridSize, y: GridSize, cell: Cell) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = cell;

        Ok(())
    }

    /// Like [`Grid::set`], but takes the raw `0`/`1` representation.
    pub fn set_bit(&mut self, x: GridSize, y: GridSize, value: i64) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = Cell::try_from(value)?;

        Ok(())
    }

    /// Flip a single cell, returning its new state
    pub fn toggle(&mut self, x: GridSize, y: GridSize) -> Result<Cell, GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = self.cells[i].toggled();

        Ok(self.cells[i])
    }

    /// Reallocate to `width`x`height`. Cells present in both the old and new bounds are kept, every
    /// other cell starts out dead.
    pub fn resize(&mut self, width: GridSize, height: GridSize) -> Result<(), GridError> {
        let old = &*self;
        let resized = Self::from_fn(width, height, |x, y| {
            if x < old.width && y < old.height {
                old.cells[old.xy_from(x, y)]
            } else {
                Cell::Dead
            }
        })?;

        info!(
            from = ?(self.width, self.height),
            to = ?(width, height),
            "resized grid"
        );

        *self = resized;

        Ok(())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub fn is_dead(&self) -> bool {
        self.cells.iter().all(|c| !c.is_alive())
    }

    /// Nested `0`/`1` rows, outer length `width`, inner length `height`.
    pub fn serialize(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.height)
            .map(|column| column.iter().map(|&c| u8::from(c)).collect())
            .collect()
    }

    /// Inverse of [`Grid::serialize`]. The shape is validated before anything is built.
    pub fn deserialize<T>(data: &[Vec<T>]) -> Result<Self, GridError>
    where
        T: Copy + Into<i64>,
    {
        let Some(first) = data.first() else {
            return Err(GridError::MalformedGridData {
                reason: "no columns".to_string(),
            });
        };

        let (width, height) = (data.len(), first.len());
        if height == 0 {
            return Err(GridError::MalformedGridData {
                reason: "empty column".to_string(),
            });
        }

        if let Some((x, column)) = data
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != height)
        {
            return Err(GridError::MalformedGridData {
                reason: format!("column {x} has {} cells, expected {height}", column.len()),
            });
        }

        // Every column now has `height` cells, so this matches the input size
        let mut cells = Vec::with_capacity(width * height);

        for (x, column) in data.iter().enumerate() {
            for (y, &value) in column.iter().enumerate() {
                let value = value.into();
                let Ok(cell) = Cell::try_from(value) else {
                    return Err(GridError::MalformedGridData {
                        reason: format!("cell ({x}, {y}) is {value}, expected 0 or 1"),
                    });
                };

                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn index(&self, x: GridSize, y: GridSize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(self.xy_from(x, y))
    }

    fn xy_from(&self, x: GridSize, y: GridSize) -> usize {
        x * self.height + y
    }
}

impl TryFrom<Vec<Vec<i64>>> for Grid {
    type Error = GridError;

    fn try_from(data: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::deserialize(&data)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.serialize()
    }
}
