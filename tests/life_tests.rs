use gridlife::cell::Cell;
use gridlife::grid::Grid;
use gridlife::presets::Preset;
use gridlife::rules;
use gridlife::session::Session;
use gridlife::session::Settings;

fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
    let mut alive = Vec::new();

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if grid.get(x, y).is_ok_and(Cell::is_alive) {
                alive.push((x, y));
            }
        }
    }

    alive
}

#[test]
fn glider_moves_diagonally() -> anyhow::Result<()> {
    let mut grid = Grid::new(12, 12)?;
    Preset::Glider.place(&mut grid, 2, 2)?;

    let start = alive_cells(&grid);
    assert_eq!(start.len(), 5);

    // Every intermediate phase still has 5 cells
    for _ in 0..3 {
        grid = rules::step(&grid);
        assert_eq!(grid.population(), 5);
    }
    grid = rules::step(&grid);

    let shifted: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(alive_cells(&grid), shifted);

    Ok(())
}

#[test]
fn beacon_has_period_two() -> anyhow::Result<()> {
    let mut grid = Grid::new(8, 8)?;
    Preset::Beacon.place(&mut grid, 2, 2)?;

    let phase0 = grid.clone();
    let phase1 = rules::step(&phase0);

    assert_ne!(phase0, phase1);
    assert_eq!(phase1.population(), 6);
    assert_eq!(rules::step(&phase1), phase0);

    Ok(())
}

#[test]
fn glider_gun_fires() -> anyhow::Result<()> {
    let mut session = Session::new(Settings {
        width: 60,
        height: 40,
        ..Settings::default()
    })?;
    session.load_preset(Preset::GliderGun)?;
    assert_eq!(session.population(), 36);

    // The gun has period 30 and emits one glider per period
    for _ in 0..30 {
        session.step();
    }

    assert_eq!(session.generation(), 30);
    assert_eq!(session.population(), 36 + 5);

    Ok(())
}

#[test]
fn glider_dies_in_the_corner() -> anyhow::Result<()> {
    // Bounded edges: a glider heading off the grid turns into a block instead of wrapping around
    let mut grid = Grid::new(6, 6)?;
    Preset::Glider.place(&mut grid, 3, 3)?;

    for _ in 0..20 {
        grid = rules::step(&grid);
    }

    assert_eq!(alive_cells(&grid), vec![(4, 4), (4, 5), (5, 4), (5, 5)]);

    Ok(())
}
