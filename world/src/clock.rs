//! Countdown that limits how long a level may be played.

use tile_rush_core::ClockState;

/// Result of delivering a one-second tick to the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockTick {
    /// The clock was paused or already expired; no time was consumed.
    Ignored,
    /// A second was consumed and time remains.
    Counted {
        /// Whole seconds left after the tick.
        time_remaining: u32,
    },
    /// The tick consumed the last second. Reported once per countdown.
    Expired,
}

/// Pausable countdown measured in whole seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionClock {
    state: ClockState,
    time_remaining: u32,
}

impl SessionClock {
    /// Creates a running clock holding the provided number of seconds.
    #[must_use]
    pub const fn new(time_limit_seconds: u32) -> Self {
        Self {
            state: ClockState::Running,
            time_remaining: time_limit_seconds,
        }
    }

    /// Current state of the countdown.
    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Reports whether the countdown is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused)
    }

    /// Stops consuming time. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.state = ClockState::Paused;
        true
    }

    /// Resumes consuming time. Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state != ClockState::Paused {
            return false;
        }
        self.state = ClockState::Running;
        true
    }

    /// Consumes a single second while running.
    pub fn tick(&mut self) -> ClockTick {
        if self.state != ClockState::Running {
            return ClockTick::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.state = ClockState::Expired;
            return ClockTick::Expired;
        }

        ClockTick::Counted {
            time_remaining: self.time_remaining,
        }
    }

    /// Restarts the countdown with a fresh budget, clearing any pause.
    pub fn reset(&mut self, time_limit_seconds: u32) {
        *self = Self::new(time_limit_seconds);
    }
}
