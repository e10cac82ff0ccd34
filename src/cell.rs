use crate::grid::GridError;

/// The state of a single grid cell.
///
/// On the wire (and in the persistence format) a cell is the integer `0` or `1`.
#[repr(u8)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// The opposite state. Used when a cell is clicked.
    pub const fn toggled(self) -> Self {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }

    pub const fn from_bit(bit: bool) -> Self {
        if bit { Cell::Alive } else { Cell::Dead }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell as u8
    }
}

impl TryFrom<u8> for Cell {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Dead),
            1 => Ok(Cell::Alive),
            value => Err(GridError::InvalidCellValue {
                value: value as i64,
            }),
        }
    }
}

impl TryFrom<i64> for Cell {
    type Error = GridError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Dead),
            1 => Ok(Cell::Alive),
            value => Err(GridError::InvalidCellValue { value }),
        }
    }
}
