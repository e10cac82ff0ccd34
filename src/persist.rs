//! Saving and loading grids as JSON.
//!
//! The format is a nested array of `0`/`1` integers, outer length `width`, inner length `height`:
//!
//! ```json
//! [[0, 1, 0], [0, 0, 1], [1, 1, 1]]
//! ```

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::grid::Grid;
use crate::grid::GridError;

/// File extension used for saved grids
pub const EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Failed to encode grid: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Parse a grid. Anything that isn't a rectangular array of `0`/`1` is `MalformedGridData`.
pub fn from_json(text: &str) -> Result<Grid, GridError> {
    serde_json::from_str(text).map_err(|e| GridError::MalformedGridData {
        reason: e.to_string(),
    })
}

pub fn to_json(grid: &Grid) -> Result<String, PersistError> {
    Ok(serde_json::to_string(grid)?)
}

pub fn read_file(path: &Path) -> Result<Grid, PersistError> {
    let text = fs::read_to_string(path)?;
    let grid = from_json(&text)?;

    info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        "loaded grid"
    );

    Ok(grid)
}

pub fn write_file(path: &Path, grid: &Grid) -> Result<(), PersistError> {
    fs::write(path, to_json(grid)?)?;

    info!(path = %path.display(), "saved grid");

    Ok(())
}

#[cfg(test)]
mod test {
    use super::from_json;
    use super::to_json;
    use crate::cell::Cell;
    use crate::grid::Grid;
    use crate::grid::GridError;

    #[test]
    fn writes_compact_json() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set(1, 2, Cell::Alive).unwrap();

        assert_eq!(to_json(&grid).unwrap(), "[[0,0,0],[0,0,1]]");
    }

    #[test]
    fn reads_dimensions_from_data() {
        let grid = from_json("[[0, 1, 0], [0, 0, 1]]").unwrap();

        assert_eq!((grid.width(), grid.height()), (2, 3));
        assert_eq!(grid.get(0, 1).unwrap(), Cell::Alive);
        assert_eq!(grid.get(1, 2).unwrap(), Cell::Alive);
    }

    #[test]
    fn rejects_malformed() {
        for text in [
            "",
            "{}",
            "[]",
            "[[]]",
            "[[0, 1], [1]]",
            "[[0, 2]]",
            "[[0, -1]]",
            "[[0, \"1\"]]",
            "[[0, 0.5]]",
            "[0, 1]",
            "[[0, 1]",
        ] {
            let res = from_json(text);
            assert!(
                matches!(res, Err(GridError::MalformedGridData { .. })),
                "{text:?} gave {res:?}"
            );
        }
    }

    #[test]
    fn rejects_long_column_followed_by_empty_ones() {
        // Sized by the first column this would be a 10^10 cell grid
        let n = 100_000;
        let mut text = String::from("[[");
        text.push_str(&vec!["0"; n].join(","));
        text.push(']');
        text.push_str(&",[]".repeat(n));
        text.push(']');

        let res = from_json(&text);
        assert!(
            matches!(
                &res,
                Err(GridError::MalformedGridData { reason }) if reason.starts_with("column 1 ")
            ),
            "{res:?}"
        );
    }
}
