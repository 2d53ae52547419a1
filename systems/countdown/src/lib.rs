#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic countdown system that turns elapsed time into clock ticks.

use std::time::Duration;

use tile_rush_core::{ClockState, Command, Event, SessionPhase};

const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the countdown system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    period: Duration,
}

impl Config {
    /// Creates a configuration that emits one tick per `period` of elapsed time.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

/// Pure system that emits [`Command::ElapseSecond`] for each whole period of
/// time that passes while the countdown is running.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    accumulator: Duration,
}

impl Countdown {
    /// Creates a new countdown system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period: config.period,
            accumulator: Duration::ZERO,
        }
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Consumes events and the session state to emit countdown commands.
    ///
    /// Partial periods are discarded whenever the clock stops running or a
    /// level starts, so a resumed or fresh countdown always waits a full period.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: SessionPhase,
        clock: ClockState,
        out: &mut Vec<Command>,
    ) {
        if phase != SessionPhase::Active || clock != ClockState::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.period.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::LevelStarted { .. } | Event::PauseChanged { .. } => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                _ => {}
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            out.push(Command::ElapseSecond);
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
