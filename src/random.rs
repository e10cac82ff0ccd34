use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::GridSize;
use crate::cell::Cell;
use crate::grid::Grid;
use crate::grid::GridError;

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;

/// The generator works modulo `2^48`
const STATE_BITS: u32 = 48;
const STATE_MASK: u64 = (1 << STATE_BITS) - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid seed \"{text}\": expected an integer in [0, 2^48)")]
    InvalidSeed { text: String },
}

/// A grid seed, always in `[0, 2^48)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(u64);

impl Seed {
    pub const MAX: u64 = STATE_MASK;

    pub fn new(value: u64) -> Result<Self, SeedError> {
        if value > Self::MAX {
            return Err(SeedError::InvalidSeed {
                text: value.to_string(),
            });
        }

        Ok(Self(value))
    }

    /// Draw a fresh seed from the thread-local entropy source
    pub fn random() -> Self {
        Self(rand::rng().random_range(0..=Self::MAX))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeedError::InvalidSeed {
            text: s.to_string(),
        };

        let digits = s.trim();

        // `u64::from_str` would happily take a leading `+`
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: u64 = digits.parse().map_err(|_| invalid())?;
        if value > Self::MAX {
            return Err(invalid());
        }

        Ok(Self(value))
    }
}

/// Linear congruential generator, `state = (0x5DEECE66D * state + 0xB) mod 2^48`.
///
/// Lives for a single randomization and is never shared.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: Seed) -> Self {
        Self { state: seed.0 }
    }

    /// Advance the state and return its top bit
    pub fn next_bit(&mut self) -> bool {
        self.state = MULTIPLIER.wrapping_mul(self.state).wrapping_add(INCREMENT) & STATE_MASK;

        (self.state >> (STATE_BITS - 1)) & 1 == 1
    }
}

/// Build a `width`x`height` grid from `seed`. One draw per cell, `x` in the outer loop.
///
/// The same seed and dimensions always produce the same grid.
pub fn randomize(width: GridSize, height: GridSize, seed: Seed) -> Result<Grid, GridError> {
    let mut lcg = Lcg::new(seed);

    Grid::from_fn(width, height, |_, _| Cell::from_bit(lcg.next_bit()))
}
