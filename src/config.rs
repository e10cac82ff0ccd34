use std::path::PathBuf;

use clap::Parser;

use crate::GridSize;
use crate::clock::ClockError;
use crate::clock::FrameRate;
use crate::persist;
use crate::presets::Preset;
use crate::random::Seed;
use crate::render::Theme;
use crate::session::Settings;

/// Largest grid side accepted on the command line
const MAX_SIDE: i64 = 10_000;

/// Conway's Game of Life in the terminal
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of grid columns
    #[arg(long, value_name = "CELLS", default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE))]
    pub width: u32,

    /// Number of grid rows
    #[arg(long, value_name = "CELLS", default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE))]
    pub height: u32,

    /// Generations per second
    #[arg(
        short = 'r',
        long,
        value_name = "FPS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(FrameRate::MIN as i64..=FrameRate::MAX as i64)
    )]
    pub frame_rate: u32,

    /// Seed for the initial grid, an integer below 2^48. Random when omitted.
    #[arg(short, long)]
    pub seed: Option<Seed>,

    /// `dark` or `light`
    #[arg(long, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Start with the simulation paused
    #[arg(long)]
    pub paused: bool,

    /// Start from a saved grid instead of a random one
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub load: Option<PathBuf>,

    /// Start from a named pattern: glider, blinker, beacon or glider-gun
    #[arg(long, value_name = "NAME")]
    pub preset: Option<Preset>,

    /// Where `s` saves and `o` loads
    #[arg(long, value_name = "PATH", default_value_os_t = default_save_path())]
    pub save_path: PathBuf,

    /// Write logs to this file. Filtered with `RUST_LOG`, `warn` by default.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn default_save_path() -> PathBuf {
    PathBuf::from("grid").with_extension(persist::EXTENSION)
}

impl Config {
    /// Session settings for a surface showing `visible` cells
    pub fn settings(&self, visible: (GridSize, GridSize)) -> Result<Settings, ClockError> {
        Ok(Settings {
            width: self.width as GridSize,
            height: self.height as GridSize,
            seed: self.seed,
            frame_rate: FrameRate::new(self.frame_rate)?,
            paused: self.paused,
            theme: self.theme,
            visible,
            cell_size: 1.0,
        })
    }
}
