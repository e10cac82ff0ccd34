use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Generation;
use crate::GridSize;
use crate::cell::Cell;
use crate::clock::ClockState;
use crate::clock::FrameRate;
use crate::clock::SimulationClock;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::persist;
use crate::persist::PersistError;
use crate::presets::Preset;
use crate::presets::PresetError;
use crate::random;
use crate::random::Seed;
use crate::random::SeedError;
use crate::render::Theme;
use crate::rules;
use crate::viewport::Viewport;
use crate::viewport::ViewportError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// How a session starts out
#[derive(Debug, Clone)]
pub struct Settings {
    pub width: GridSize,
    pub height: GridSize,

    /// `None` draws a fresh seed
    pub seed: Option<Seed>,

    pub frame_rate: FrameRate,
    pub paused: bool,
    pub theme: Theme,

    /// Cells the rendering surface can show
    pub visible: (GridSize, GridSize),

    /// Logical pixels per cell
    pub cell_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: None,
            frame_rate: FrameRate::default(),
            paused: false,
            theme: Theme::default(),
            visible: (100, 100),
            cell_size: 1.0,
        }
    }
}

/// All of the simulation's state: the grid, the generation counter, the clock and the viewport.
///
/// Every operation either succeeds or leaves the session as it was.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    generation: Generation,
    clock: SimulationClock,
    viewport: Viewport,
    theme: Theme,

    /// Seed of the last randomization
    seed: Option<Seed>,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self, SessionError> {
        let seed = settings.seed.unwrap_or_else(Seed::random);
        let grid = random::randomize(settings.width, settings.height, seed)?;

        let mut clock = SimulationClock::new(settings.frame_rate);
        if settings.paused {
            clock.pause();
        }

        let (vw, vh) = settings.visible;
        let viewport = Viewport::new(vw, vh, settings.cell_size);

        info!(
            width = settings.width,
            height = settings.height,
            %seed,
            "new session"
        );

        Ok(Self {
            grid,
            generation: 0,
            clock,
            viewport,
            theme: settings.theme,
            seed: Some(seed),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn seed(&self) -> Option<Seed> {
        self.seed
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Advance exactly one generation
    pub fn step(&mut self) {
        self.grid = rules::step(&self.grid);
        self.generation += 1;

        debug!(generation = self.generation, "step");
    }

    /// Run a step if the clock says one is due, then arm the next one. Returns whether the grid
    /// changed and should be redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        let stepped = self.clock.poll(now);
        if stepped {
            self.step();
        }

        self.clock.schedule(now);

        stepped
    }

    pub fn start(&mut self) -> bool {
        self.clock.start()
    }

    pub fn pause(&mut self) -> bool {
        self.clock.pause()
    }

    pub fn toggle_pause(&mut self) -> ClockState {
        self.clock.toggle();
        self.clock.state()
    }

    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        self.clock.set_frame_rate(rate);
    }

    /// Replace the grid with a random one of the same size. The generation counter is kept.
    pub fn randomize(&mut self, seed: Option<Seed>) -> Result<Seed, SessionError> {
        let seed = seed.unwrap_or_else(Seed::random);
        self.grid = random::randomize(self.grid.width(), self.grid.height(), seed)?;
        self.seed = Some(seed);

        info!(%seed, "randomized grid");

        Ok(seed)
    }

    /// Like [`Session::randomize`], with the seed given as text. Bad text leaves the grid as it is.
    pub fn randomize_text(&mut self, text: &str) -> Result<Seed, SessionError> {
        let seed = text.parse::<Seed>().inspect_err(|e| warn!("{e}"))?;

        self.randomize(Some(seed))
    }

    /// Kill every cell and reset the generation counter
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;

        info!("cleared grid");
    }

    /// Resize the grid, keeping the overlapping cells. The generation counter is kept.
    pub fn resize(&mut self, width: GridSize, height: GridSize) -> Result<(), SessionError> {
        self.grid.resize(width, height)?;
        self.viewport.clamp(&self.grid);

        Ok(())
    }

    /// Grow or shrink both dimensions by `delta`, never below 1
    pub fn resize_by(&mut self, delta: isize) -> Result<(), SessionError> {
        let width = self.grid.width().saturating_add_signed(delta).max(1);
        let height = self.grid.height().saturating_add_signed(delta).max(1);

        self.resize(width, height)
    }

    pub fn get(&self, x: GridSize, y: GridSize) -> Result<Cell, SessionError> {
        Ok(self.grid.get(x, y)?)
    }

    pub fn set(&mut self, x: GridSize, y: GridSize, cell: Cell) -> Result<(), SessionError> {
        Ok(self.grid.set(x, y, cell)?)
    }

    /// A click on the surface: flip the cell under the pointer
    pub fn toggle_at(
        &mut self,
        pixel_x: f64,
        pixel_y: f64,
        canvas_scale: f64,
    ) -> Result<Cell, SessionError> {
        let (x, y) = self.pixel_to_cell(pixel_x, pixel_y, canvas_scale)?;

        Ok(self.grid.toggle(x, y)?)
    }

    /// A drag on the surface: paint the cell under the pointer
    pub fn paint_at(
        &mut self,
        pixel_x: f64,
        pixel_y: f64,
        canvas_scale: f64,
        cell: Cell,
    ) -> Result<(), SessionError> {
        let (x, y) = self.pixel_to_cell(pixel_x, pixel_y, canvas_scale)?;

        Ok(self.grid.set(x, y, cell)?)
    }

    fn pixel_to_cell(
        &self,
        pixel_x: f64,
        pixel_y: f64,
        canvas_scale: f64,
    ) -> Result<(GridSize, GridSize), SessionError> {
        let (x, y) = self
            .viewport
            .to_grid_coords(pixel_x, pixel_y, canvas_scale)
            .ok_or(ViewportError::PixelOutside { pixel_x, pixel_y })?;

        // Only cells inside the visible window can be clicked
        let (xs, ys) = self.viewport.window(&self.grid);
        if !xs.contains(&x) || !ys.contains(&y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.grid.width(),
                height: self.grid.height(),
            }
            .into());
        }

        Ok((x, y))
    }

    pub fn set_offset(&mut self, x: GridSize, y: GridSize) -> Result<(), SessionError> {
        Ok(self.viewport.set_offset(x, y, &self.grid)?)
    }

    pub fn pan(&mut self, dx: isize, dy: isize) {
        self.viewport.pan(dx, dy, &self.grid);
    }

    /// The rendering surface changed size
    pub fn set_visible_size(&mut self, width: GridSize, height: GridSize) {
        self.viewport.set_visible_size(width, height, &self.grid);
    }

    /// Clear the grid and put `preset` in its center. Nothing changes if the preset doesn't fit.
    pub fn load_preset(&mut self, preset: Preset) -> Result<(), SessionError> {
        let (x, y) = preset.centered_offset(&self.grid)?;

        self.clear();
        preset.place(&mut self.grid, x, y)?;

        info!(%preset, x, y, "loaded preset");

        Ok(())
    }

    /// Replace the grid with one parsed from JSON. The new dimensions come from the data.
    pub fn load_json(&mut self, text: &str) -> Result<(), SessionError> {
        let grid = persist::from_json(text).inspect_err(|e| warn!("{e}"))?;
        self.replace_grid(grid);

        Ok(())
    }

    pub fn save_json(&self) -> Result<String, SessionError> {
        Ok(persist::to_json(&self.grid)?)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let grid = persist::read_file(path).inspect_err(|e| warn!("{e}"))?;
        self.replace_grid(grid);

        Ok(())
    }

    pub fn save_file(&self, path: &Path) -> Result<(), SessionError> {
        Ok(persist::write_file(path, &self.grid)?)
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.viewport.clamp(&self.grid);
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;
    use std::time::Instant;

    use super::Session;
    use super::SessionError;
    use super::Settings;
    use crate::cell::Cell;
    use crate::clock::FrameRate;
    use crate::grid::GridError;
    use crate::presets::Preset;
    use crate::presets::PresetError;
    use crate::random::Seed;
    use crate::random::SeedError;
    use crate::viewport::ViewportError;

    fn session(width: usize, height: usize) -> Session {
        Session::new(Settings {
            width,
            height,
            seed: Some(Seed::new(1).unwrap()),
            visible: (width, height),
            ..Settings::default()
        })
        .unwrap()
    }

    #[test]
    fn seeded_sessions_match() {
        let a = session(30, 20);
        let b = session(30, 20);

        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.seed(), Some(Seed::new(1).unwrap()));
        assert_eq!(a.generation(), 0);
    }

    #[test]
    fn generation_counter() {
        let mut s = session(10, 10);

        s.step();
        s.step();
        assert_eq!(s.generation(), 2);

        s.resize(12, 12).unwrap();
        s.randomize(None).unwrap();
        s.set(0, 0, Cell::Alive).unwrap();
        assert_eq!(s.generation(), 2);

        s.step();
        assert_eq!(s.generation(), 3);

        s.clear();
        assert_eq!(s.generation(), 0);
        assert!(s.grid().is_dead());
    }

    #[test]
    fn bad_seed_text_keeps_grid() {
        let mut s = session(10, 10);
        let before = s.grid().clone();

        let err = s.randomize_text("not a number").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Seed(SeedError::InvalidSeed { .. })
        ));
        assert_eq!(s.grid(), &before);
        assert_eq!(s.seed(), Some(Seed::new(1).unwrap()));

        let seed = s.randomize_text("99").unwrap();
        assert_eq!(seed.value(), 99);
        assert_eq!(s.seed(), Some(seed));
    }

    #[test]
    fn tick_follows_clock() {
        let mut s = Session::new(Settings {
            width: 5,
            height: 5,
            seed: Some(Seed::new(3).unwrap()),
            frame_rate: FrameRate::new(10).unwrap(),
            ..Settings::default()
        })
        .unwrap();
        let t0 = Instant::now();

        // The first tick only arms the clock
        assert!(!s.tick(t0));
        assert!(!s.tick(t0 + Duration::from_millis(50)));
        assert!(s.tick(t0 + Duration::from_millis(100)));
        assert_eq!(s.generation(), 1);

        s.pause();
        // The step armed by the last tick still runs
        assert!(s.tick(t0 + Duration::from_millis(200)));
        assert!(!s.tick(t0 + Duration::from_secs(5)));
        assert_eq!(s.generation(), 2);

        s.start();
        let t1 = t0 + Duration::from_secs(6);
        assert!(!s.tick(t1));
        assert!(s.tick(t1 + Duration::from_millis(100)));
        assert_eq!(s.generation(), 3);
    }

    #[test]
    fn clicks_go_through_the_viewport() {
        let mut s = Session::new(Settings {
            width: 20,
            height: 20,
            seed: Some(Seed::new(0).unwrap()),
            visible: (10, 10),
            cell_size: 4.0,
            ..Settings::default()
        })
        .unwrap();
        s.clear();
        s.set_offset(5, 7).unwrap();

        assert_eq!(s.toggle_at(9.0, 0.0, 1.0).unwrap(), Cell::Alive);
        assert_eq!(s.get(7, 7).unwrap(), Cell::Alive);

        s.paint_at(9.0, 0.0, 1.0, Cell::Alive).unwrap();
        assert_eq!(s.get(7, 7).unwrap(), Cell::Alive);

        // 10 cells past the offset is outside of the window
        assert!(matches!(
            s.toggle_at(40.0, 0.0, 1.0),
            Err(SessionError::Grid(GridError::OutOfBounds { .. }))
        ));
        assert_eq!(s.population(), 1);
    }

    #[test]
    fn clicks_off_the_surface_keep_the_pixel() {
        let mut s = Session::new(Settings {
            width: 20,
            height: 20,
            seed: Some(Seed::new(0).unwrap()),
            visible: (10, 10),
            ..Settings::default()
        })
        .unwrap();
        s.clear();
        s.set_offset(5, 5).unwrap();

        for (px, py) in [(-3.0, 2.0), (1e30, 0.0), (0.0, f64::NAN)] {
            let res = s.toggle_at(px, py, 1.0);
            assert!(
                matches!(
                    res,
                    Err(SessionError::Viewport(ViewportError::PixelOutside { pixel_x, .. }))
                        if pixel_x == px
                ),
                "({px}, {py}) gave {res:?}"
            );
        }

        assert!(s.paint_at(1e30, 1e30, 1.0, Cell::Alive).is_err());
        assert_eq!(s.population(), 0);
    }

    #[test]
    fn bad_offset_keeps_previous() {
        let mut s = session(10, 10);
        s.set_visible_size(4, 4);
        s.set_offset(2, 3).unwrap();

        assert!(matches!(
            s.set_offset(10, 0),
            Err(SessionError::Viewport(ViewportError::OffsetOutOfRange { .. }))
        ));
        assert_eq!(s.viewport().offset(), (2, 3));
    }

    #[test]
    fn resize_clamps_offset() {
        let mut s = session(20, 20);
        s.set_visible_size(5, 5);
        s.set_offset(15, 15).unwrap();

        s.resize(8, 10).unwrap();
        assert_eq!(s.viewport().offset(), (3, 5));

        s.resize_by(-100).unwrap();
        assert_eq!((s.grid().width(), s.grid().height()), (1, 1));
        assert_eq!(s.viewport().offset(), (0, 0));
    }

    #[test]
    fn presets_are_centered() {
        let mut s = session(10, 10);
        s.step();

        s.load_preset(Preset::Blinker).unwrap();
        assert_eq!(s.generation(), 0);
        assert_eq!(s.population(), 3);
        for x in 3..6 {
            assert_eq!(s.get(x, 4).unwrap(), Cell::Alive);
        }
    }

    #[test]
    fn preset_too_big_keeps_grid() {
        let mut s = session(10, 10);
        s.step();
        let before = s.grid().clone();

        assert!(matches!(
            s.load_preset(Preset::GliderGun),
            Err(SessionError::Preset(PresetError::DoesNotFit { .. }))
        ));
        assert_eq!(s.grid(), &before);
        assert_eq!(s.generation(), 1);
    }

    #[test]
    fn load_json_replaces_grid() {
        let mut s = session(10, 10);
        s.set_visible_size(4, 4);
        s.set_offset(6, 6).unwrap();

        s.load_json("[[1, 0, 0], [0, 1, 0]]").unwrap();
        assert_eq!((s.grid().width(), s.grid().height()), (2, 3));
        assert_eq!(s.viewport().offset(), (0, 0));
        assert_eq!(s.save_json().unwrap(), "[[1,0,0],[0,1,0]]");
    }

    #[test]
    fn malformed_json_keeps_grid() {
        let mut s = session(10, 10);
        let before = s.grid().clone();

        assert!(matches!(
            s.load_json("[[0, 1], [2, 0]]"),
            Err(SessionError::Grid(GridError::MalformedGridData { .. }))
        ));
        assert_eq!(s.grid(), &before);
    }
}
