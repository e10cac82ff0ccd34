pub mod camera;
pub mod cell;
pub mod clock;
pub mod config;
pub mod grid;
pub mod persist;
pub mod presets;
pub mod random;
pub mod render;
pub mod rules;
pub mod session;
pub mod viewport;

/// Side length of a grid, and any coordinate into it.
pub type GridSize = usize;

/// Number of completed generations.
pub type Generation = u64;
