use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("Frame rate must be between {min} and {max}, got {rate}", min = FrameRate::MIN, max = FrameRate::MAX)]
    InvalidFrameRate { rate: u32 },
}

/// Generations per second, in `[1, 60]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameRate(u32);

impl FrameRate {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 60;

    pub const fn new(rate: u32) -> Result<Self, ClockError> {
        if rate < Self::MIN || rate > Self::MAX {
            return Err(ClockError::InvalidFrameRate { rate });
        }

        Ok(Self(rate))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Time between two steps, `1000 / rate` milliseconds
    pub fn interval(self) -> Duration {
        Duration::from_secs(1) / self.0
    }

    pub fn faster(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    pub fn slower(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Schedules generation steps.
///
/// There is never more than one pending step. Pausing stops new steps from being scheduled, but a
/// step that was already pending still fires.
#[derive(Debug)]
pub struct SimulationClock {
    state: ClockState,
    rate: FrameRate,

    /// When the pending step is due, if there is one
    pending: Option<Instant>,
}

impl SimulationClock {
    pub fn new(rate: FrameRate) -> Self {
        Self {
            state: ClockState::Running,
            rate,
            pending: None,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.rate
    }

    /// Applies from the next scheduled step on. A step that is already pending keeps its deadline.
    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        debug!(rate = rate.get(), "frame rate changed");
        self.rate = rate;
    }

    /// Resume scheduling. Returns whether the clock was paused.
    pub fn start(&mut self) -> bool {
        if self.state == ClockState::Running {
            return false;
        }

        debug!("clock started");
        self.state = ClockState::Running;

        true
    }

    /// Stop scheduling. Returns whether the clock was running.
    pub fn pause(&mut self) -> bool {
        if self.state == ClockState::Paused {
            return false;
        }

        debug!("clock paused");
        self.state = ClockState::Paused;

        true
    }

    pub fn toggle(&mut self) {
        match self.state {
            ClockState::Running => self.pause(),
            ClockState::Paused => self.start(),
        };
    }

    /// Arm the next step `interval` after `now`, unless the clock is paused or a step is already
    /// pending.
    pub fn schedule(&mut self, now: Instant) {
        if self.state == ClockState::Paused || self.pending.is_some() {
            return;
        }

        self.pending = Some(now + self.rate.interval());
    }

    /// Returns `true` if the pending step is due, consuming it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(due) if now >= due => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Deadline of the pending step
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }
}
