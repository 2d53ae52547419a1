#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Rush engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! render sinks to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tile Rush.";

/// Number of cells along each edge of the square board.
pub const GRID_SIDE: usize = 4;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Slides and merges every line of the board toward the provided direction.
    Move {
        /// Direction the tiles should travel.
        direction: Direction,
    },
    /// Reports real time that elapsed since the previous tick.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Consumes one second from the session countdown.
    ElapseSecond,
    /// Freezes the countdown and blocks move acceptance.
    Pause,
    /// Restarts the countdown and unblocks move acceptance.
    Resume,
    /// Acknowledges a completed level and loads the next configuration.
    AdvanceLevel,
    /// Acknowledges a lost session and restarts from the first level.
    ResetToLevelOne,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that wall-clock time elapsed.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the countdown consumed a second.
    ClockTicked {
        /// Whole seconds left in the active level.
        time_remaining: u32,
    },
    /// Announces that the countdown reached zero.
    ClockExpired,
    /// Announces that the pause state toggled.
    PauseChanged {
        /// Whether the session is paused after processing the command.
        paused: bool,
    },
    /// Confirms that a move changed the board.
    GridShifted {
        /// Direction the tiles travelled.
        direction: Direction,
        /// Sum of every merged tile value produced by the move.
        score_delta: u64,
    },
    /// Confirms that a tile appeared in a previously empty cell.
    TileSpawned {
        /// Cell that received the tile.
        cell: CellCoord,
        /// Tile placed into the cell.
        tile: Tile,
    },
    /// Reports the new score after merges were credited.
    ScoreChanged {
        /// Score accumulated within the active level.
        score: u64,
    },
    /// Reports the move budget after a move was consumed.
    MovesRemainingChanged {
        /// Moves still available within the active level.
        moves: MoveBudget,
    },
    /// Announces that a level became active with fresh budgets.
    LevelStarted {
        /// Level that became active.
        level: LevelNumber,
    },
    /// Announces that the active level reached its score target.
    LevelCompleted {
        /// Level whose target was reached.
        level: LevelNumber,
    },
    /// Announces that the session was lost.
    GameOver {
        /// Budget whose exhaustion ended the session.
        reason: GameOverReason,
    },
    /// Announces that every configured level was completed.
    AllLevelsCompleted,
}

/// Directions a move may push the tiles toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward row zero.
    Up,
    /// Movement toward the last row.
    Down,
    /// Movement toward column zero.
    Left,
    /// Movement toward the last column.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Reports whether the direction travels along rows rather than columns.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Reports whether tiles gather at the highest index of each line.
    #[must_use]
    pub const fn toward_end(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(label)
    }
}

/// Value held by a single board cell. Zero marks an empty cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tile(u32);

impl Tile {
    /// The empty cell marker.
    pub const EMPTY: Self = Self(0);

    /// Creates a tile holding the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value carried by the tile.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Reports whether the cell holds no tile.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Tile produced when two tiles of this value merge.
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self(self.0.saturating_mul(2))
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    fn index(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let column = usize::try_from(self.column).ok()?;
        (row < GRID_SIDE && column < GRID_SIDE).then_some((row, column))
    }
}

/// Fixed 4×4 matrix of tiles stored row-major.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: [[Tile; GRID_SIDE]; GRID_SIDE],
}

impl Grid {
    /// Creates a board with no tiles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: [[Tile::EMPTY; GRID_SIDE]; GRID_SIDE],
        }
    }

    /// Creates a board from raw row-major values.
    #[must_use]
    pub fn from_values(values: [[u32; GRID_SIDE]; GRID_SIDE]) -> Self {
        Self {
            rows: values.map(|row| row.map(Tile::new)),
        }
    }

    /// Raw row-major values of the board.
    #[must_use]
    pub fn values(&self) -> [[u32; GRID_SIDE]; GRID_SIDE] {
        self.rows.map(|row| row.map(|tile| tile.value()))
    }

    /// Tile stored in the provided cell, if the cell lies on the board.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        cell.index().map(|(row, column)| self.rows[row][column])
    }

    /// Returns a copy of the board with the provided cell replaced.
    ///
    /// Cells outside the board leave the copy untouched.
    #[must_use]
    pub fn with_tile(mut self, cell: CellCoord, tile: Tile) -> Self {
        if let Some((row, column)) = cell.index() {
            self.rows[row][column] = tile;
        }
        self
    }

    /// Iterator over every cell and its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(column, tile)| (CellCoord::new(column as u32, row as u32), *tile))
        })
    }

    /// Cells that currently hold no tile, in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|(_, tile)| tile.is_empty())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of cells holding a tile.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells().filter(|(_, tile)| !tile.is_empty()).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line = row
                .iter()
                .map(|tile| {
                    if tile.is_empty() {
                        format!("{:>5}", ".")
                    } else {
                        format!("{:>5}", tile.value())
                    }
                })
                .collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Outcome of sliding the board in one direction.
///
/// The prior board is never mutated; callers adopt `new_grid` only when
/// `changed` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// Board produced by the move.
    pub new_grid: Grid,
    /// Whether `new_grid` differs from the board the move was applied to.
    pub changed: bool,
    /// Sum of every merged tile value produced by the move.
    pub score_delta: u64,
}

/// Number of moves a level allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveBudget {
    /// A finite number of moves remain.
    Bounded(u32),
    /// Moves are never exhausted.
    Unbounded,
}

impl MoveBudget {
    /// Reports whether no moves remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Bounded(0))
    }

    /// Budget left after spending a single move.
    #[must_use]
    pub const fn consume(self) -> Self {
        match self {
            Self::Bounded(moves) => Self::Bounded(moves.saturating_sub(1)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

impl From<Option<u32>> for MoveBudget {
    fn from(limit: Option<u32>) -> Self {
        limit.map_or(Self::Unbounded, Self::Bounded)
    }
}

impl fmt::Display for MoveBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(moves) => write!(f, "{moves}"),
            Self::Unbounded => f.write_str("Unlimited"),
        }
    }
}

/// Budgets and goal associated with a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    score_target: u64,
    time_limit_seconds: u32,
    move_limit: MoveBudget,
}

impl LevelConfig {
    /// Creates a new level configuration.
    #[must_use]
    pub const fn new(score_target: u64, time_limit_seconds: u32, move_limit: MoveBudget) -> Self {
        Self {
            score_target,
            time_limit_seconds,
            move_limit,
        }
    }

    /// Score required to complete the level.
    #[must_use]
    pub const fn score_target(&self) -> u64 {
        self.score_target
    }

    /// Seconds available to reach the score target.
    #[must_use]
    pub const fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    /// Moves available to reach the score target.
    #[must_use]
    pub const fn move_limit(&self) -> MoveBudget {
        self.move_limit
    }
}

/// One-based position of a level within the level table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelNumber(u32);

impl LevelNumber {
    /// Creates a level number from its one-based value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The first level of every session.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Retrieves the one-based value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Zero-based index into the level table, if the number is valid.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        let index = self.0.checked_sub(1)?;
        usize::try_from(index).ok()
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progression phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Moves and countdown ticks are accepted.
    Active,
    /// The score target was reached; awaiting an advance acknowledgement.
    LevelComplete,
    /// A budget ran out before the target was reached; awaiting a reset.
    GameOver,
    /// Every configured level was completed. Terminal.
    AllLevelsComplete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::LevelComplete => "level complete",
            Self::GameOver => "game over",
            Self::AllLevelsComplete => "all levels complete",
        };
        f.write_str(label)
    }
}

/// State of the session countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockState {
    /// Seconds are being consumed.
    Running,
    /// No time is consumed until resumed.
    Paused,
    /// The countdown reached zero.
    Expired,
}

/// Budget whose exhaustion ended a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The countdown reached zero.
    TimeExpired,
    /// The move budget reached zero.
    MovesExhausted,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeExpired => {
                f.write_str("time ran out before the target score was reached")
            }
            Self::MovesExhausted => {
                f.write_str("moves ran out before the target score was reached")
            }
        }
    }
}

/// Transition requested from a phase that does not permit it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `AdvanceLevel` was issued outside [`SessionPhase::LevelComplete`].
    #[error("cannot advance level while the session is {phase}")]
    NotLevelComplete {
        /// Phase the session was in when the command arrived.
        phase: SessionPhase,
    },
    /// `ResetToLevelOne` was issued outside [`SessionPhase::GameOver`].
    #[error("cannot reset to level one while the session is {phase}")]
    NotGameOver {
        /// Phase the session was in when the command arrived.
        phase: SessionPhase,
    },
}
