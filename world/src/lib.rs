#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Tile Rush.
//!
//! The [`World`] owns the board, the level budgets and the countdown. Every
//! mutation flows through [`apply`], which runs a single [`Command`] to
//! completion and reports what happened as [`Event`] values. Read-only access
//! is offered through the [`query`] module.

pub mod clock;
pub mod grid;
pub mod levels;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use tile_rush_core::{
    Command, Direction, Event, GameOverReason, Grid, LevelConfig, LevelNumber, MoveBudget,
    SessionPhase, TransitionError, WELCOME_BANNER,
};

use crate::{
    clock::{ClockTick, SessionClock},
    levels::{LevelLookup, LevelTable},
};

const INITIAL_TILES: usize = 2;

/// Represents the authoritative Tile Rush session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    levels: LevelTable,
    level: LevelNumber,
    config: LevelConfig,
    grid: Grid,
    score: u64,
    moves: MoveBudget,
    clock: SessionClock,
    phase: SessionPhase,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a session at the first level of `levels` with two seeded tiles.
    ///
    /// The seed drives every tile spawn, so equal seeds replay identically.
    #[must_use]
    pub fn new(levels: LevelTable, rng_seed: u64) -> Self {
        let config = *levels.first();
        let mut world = Self {
            banner: WELCOME_BANNER,
            level: LevelNumber::first(),
            config,
            grid: Grid::empty(),
            score: 0,
            moves: config.move_limit(),
            clock: SessionClock::new(config.time_limit_seconds()),
            phase: SessionPhase::Active,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            levels,
        };
        let mut startup_events = Vec::new();
        world.load_level(LevelNumber::first(), config, &mut startup_events);
        debug!(events = startup_events.len(), "session created");
        world
    }

    fn load_level(&mut self, level: LevelNumber, config: LevelConfig, out_events: &mut Vec<Event>) {
        let was_paused = self.clock.is_paused();
        self.level = level;
        self.config = config;
        self.score = 0;
        self.moves = config.move_limit();
        self.clock.reset(config.time_limit_seconds());
        self.grid = Grid::empty();
        self.phase = SessionPhase::Active;

        info!(
            level = level.get(),
            score_target = config.score_target(),
            time_limit = config.time_limit_seconds(),
            moves = %config.move_limit(),
            "level started"
        );
        out_events.push(Event::LevelStarted { level });
        if was_paused {
            out_events.push(Event::PauseChanged { paused: false });
        }

        for _ in 0..INITIAL_TILES {
            self.spawn(out_events);
        }

        if !self.check_completion(out_events) && self.moves.is_exhausted() {
            self.check_game_over(GameOverReason::MovesExhausted, out_events);
        }
    }

    fn spawn(&mut self, out_events: &mut Vec<Event>) {
        let (grid, spawn) = grid::spawn_tile(&self.grid, &mut self.rng);
        self.grid = grid;
        if let Some(spawn) = spawn {
            out_events.push(Event::TileSpawned {
                cell: spawn.cell,
                tile: spawn.tile,
            });
        }
    }

    fn accepts_input(&self) -> bool {
        self.phase == SessionPhase::Active && !self.clock.is_paused()
    }

    fn handle_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepts_input() {
            debug!(%direction, phase = %self.phase, "move dropped");
            return;
        }
        if self.moves.is_exhausted() {
            debug!(%direction, "move dropped with no moves left");
            return;
        }

        let result = grid::apply_move(&self.grid, direction);
        if !result.changed {
            return;
        }

        self.grid = result.new_grid;
        out_events.push(Event::GridShifted {
            direction,
            score_delta: result.score_delta,
        });

        if result.score_delta > 0 {
            self.score = self.score.saturating_add(result.score_delta);
            out_events.push(Event::ScoreChanged { score: self.score });
        }

        if let MoveBudget::Bounded(_) = self.moves {
            self.moves = self.moves.consume();
            out_events.push(Event::MovesRemainingChanged { moves: self.moves });
        }

        self.spawn(out_events);

        if self.check_completion(out_events) {
            return;
        }
        if self.moves.is_exhausted() {
            self.check_game_over(GameOverReason::MovesExhausted, out_events);
        }
    }

    fn handle_elapsed_second(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Active {
            return;
        }

        match self.clock.tick() {
            ClockTick::Ignored => {}
            ClockTick::Counted { time_remaining } => {
                out_events.push(Event::ClockTicked { time_remaining });
            }
            ClockTick::Expired => {
                out_events.push(Event::ClockTicked { time_remaining: 0 });
                out_events.push(Event::ClockExpired);
                self.check_game_over(GameOverReason::TimeExpired, out_events);
            }
        }
    }

    fn check_completion(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.score < self.config.score_target() {
            return false;
        }

        info!(level = self.level.get(), score = self.score, "level completed");
        self.phase = SessionPhase::LevelComplete;
        out_events.push(Event::LevelCompleted { level: self.level });
        true
    }

    fn check_game_over(&mut self, reason: GameOverReason, out_events: &mut Vec<Event>) {
        if self.score >= self.config.score_target() {
            return;
        }

        info!(level = self.level.get(), score = self.score, ?reason, "game over");
        self.phase = SessionPhase::GameOver;
        out_events.push(Event::GameOver { reason });
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), TransitionError> {
        if self.phase != SessionPhase::LevelComplete {
            return Err(TransitionError::NotLevelComplete { phase: self.phase });
        }

        let next = self.level.next();
        let next_config = match self.levels.lookup(next) {
            LevelLookup::Configured(config) => Some(*config),
            LevelLookup::AllLevelsCompleted => None,
        };
        match next_config {
            Some(config) => self.load_level(next, config, out_events),
            None => {
                info!(levels = self.levels.level_count(), "all levels completed");
                self.phase = SessionPhase::AllLevelsComplete;
                out_events.push(Event::AllLevelsCompleted);
            }
        }
        Ok(())
    }

    fn reset_to_level_one(&mut self, out_events: &mut Vec<Event>) -> Result<(), TransitionError> {
        if self.phase != SessionPhase::GameOver {
            return Err(TransitionError::NotGameOver { phase: self.phase });
        }

        let config = *self.levels.first();
        self.load_level(LevelNumber::first(), config, out_events);
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Moves and countdown ticks that arrive while the session is paused or not
/// active are dropped without emitting events. Acknowledgements issued from
/// the wrong phase are rejected with a [`TransitionError`].
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), TransitionError> {
    match command {
        Command::Move { direction } => world.handle_move(direction, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::ElapseSecond => world.handle_elapsed_second(out_events),
        Command::Pause => {
            if world.clock.pause() {
                debug!("session paused");
                out_events.push(Event::PauseChanged { paused: true });
            }
        }
        Command::Resume => {
            if world.clock.resume() {
                debug!("session resumed");
                out_events.push(Event::PauseChanged { paused: false });
            }
        }
        Command::AdvanceLevel => world.advance_level(out_events)?,
        Command::ResetToLevelOne => world.reset_to_level_one(out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tile_rush_core::{ClockState, Grid, LevelConfig, LevelNumber, MoveBudget, SessionPhase};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Score accumulated within the active level.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Level currently being played, or the last one completed.
    #[must_use]
    pub fn level(world: &World) -> LevelNumber {
        world.level
    }

    /// Configuration of the level reported by [`level`].
    #[must_use]
    pub fn level_config(world: &World) -> &LevelConfig {
        &world.config
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub fn time_remaining(world: &World) -> u32 {
        world.clock.time_remaining()
    }

    /// Moves left within the active level.
    #[must_use]
    pub fn moves_remaining(world: &World) -> MoveBudget {
        world.moves
    }

    /// Progression phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// State of the countdown.
    #[must_use]
    pub fn clock_state(world: &World) -> ClockState {
        world.clock.state()
    }

    /// Reports whether the session is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.clock.is_paused()
    }

    /// Captures every value a render sink displays.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            grid: world.grid,
            score: world.score,
            level: world.level,
            score_target: world.config.score_target(),
            time_remaining: world.clock.time_remaining(),
            moves_remaining: world.moves,
            phase: world.phase,
            clock: world.clock.state(),
        }
    }

    /// Immutable copy of the session state used for presentation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SessionSnapshot {
        /// Board contents.
        pub grid: Grid,
        /// Score accumulated within the active level.
        pub score: u64,
        /// Level currently being played.
        pub level: LevelNumber,
        /// Score required to complete the level.
        pub score_target: u64,
        /// Whole seconds left on the countdown.
        pub time_remaining: u32,
        /// Moves left within the level.
        pub moves_remaining: MoveBudget,
        /// Progression phase of the session.
        pub phase: SessionPhase,
        /// State of the countdown.
        pub clock: ClockState,
    }
}
