use crate::cell::Cell;
use crate::grid::Grid;

/// Offsets of the Moore neighborhood, `(dx, dy)`
const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count the live cells around `(x, y)`. Edges are not wrapped: anything outside of the grid's
/// stored cells counts as dead.
pub fn count_neighbors(grid: &Grid, x: usize, y: usize) -> u8 {
    let (x, y) = (x as isize, y as isize);

    NEIGHBORHOOD
        .iter()
        .filter(|&&(dx, dy)| grid.cell(x + dx, y + dy).is_some_and(Cell::is_alive))
        .count() as u8
}

/// B3/S23. A dead cell with exactly 3 neighbors is born, a live cell with fewer than 2 or more than
/// 3 neighbors dies, everything else stays as it is.
pub const fn next_state(cell: Cell, neighbors: u8) -> Cell {
    match (cell, neighbors) {
        (Cell::Dead, 3) => Cell::Alive,
        (Cell::Alive, 0..=1 | 4..) => Cell::Dead,
        (cell, _) => cell,
    }
}

/// Compute the next generation. The input is left untouched and the result is built in full before
/// it is returned, so a caller swapping it in never exposes a half-updated grid.
pub fn step(grid: &Grid) -> Grid {
    grid.map(|x, y, cell| next_state(cell, count_neighbors(grid, x, y)))
}

#[cfg(test)]
mod test {
    use super::count_neighbors;
    use super::next_state;
    use super::step;
    use crate::cell::Cell;
    use crate::grid::Grid;

    fn grid_with(width: usize, height: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for &(x, y) in alive {
            grid.set(x, y, Cell::Alive).unwrap();
        }

        grid
    }

    #[test]
    fn transition_table() {
        for n in 0..=8 {
            let born = next_state(Cell::Dead, n);
            let survives = next_state(Cell::Alive, n);

            assert_eq!(born.is_alive(), n == 3, "dead cell with {n} neighbors");
            assert_eq!(
                survives.is_alive(),
                n == 2 || n == 3,
                "live cell with {n} neighbors"
            );
        }
    }

    #[test]
    fn corners_see_only_in_bounds_neighbors() {
        let grid = Grid::from_fn(3, 3, |_, _| Cell::Alive).unwrap();

        assert_eq!(count_neighbors(&grid, 0, 0), 3);
        assert_eq!(count_neighbors(&grid, 1, 0), 5);
        assert_eq!(count_neighbors(&grid, 1, 1), 8);
        assert_eq!(count_neighbors(&grid, 2, 2), 3);
    }

    #[test]
    fn edges_do_not_wrap() {
        // A blinker against the left edge would gain neighbors from the right edge if it wrapped
        let grid = grid_with(5, 5, &[(0, 1), (0, 2), (0, 3), (4, 2)]);

        assert_eq!(count_neighbors(&grid, 0, 2), 2);
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let vertical = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);

        assert_eq!(step(&horizontal), vertical);
        assert_eq!(step(&vertical), horizontal);
    }

    #[test]
    fn block_is_still() {
        let block = grid_with(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);

        assert_eq!(step(&block), block);
    }

    #[test]
    fn block_in_corner_is_still() {
        let block = grid_with(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]);

        assert_eq!(step(&block), block);
    }

    #[test]
    fn input_is_not_mutated() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        let copy = grid.clone();

        let next = step(&grid);

        assert_eq!(grid, copy);
        assert!(next.is_dead());
    }
}
