//! Ordered table of level configurations.

use thiserror::Error;
use tile_rush_core::{LevelConfig, LevelNumber, MoveBudget};

/// Level progression shipped with the game.
pub const REFERENCE_LEVELS: [LevelConfig; 5] = [
    LevelConfig::new(300, 30, MoveBudget::Unbounded),
    LevelConfig::new(500, 40, MoveBudget::Unbounded),
    LevelConfig::new(700, 50, MoveBudget::Bounded(50)),
    LevelConfig::new(1_000, 45, MoveBudget::Bounded(40)),
    LevelConfig::new(2_000, 30, MoveBudget::Bounded(10)),
];

/// Non-empty, immutable sequence of level configurations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

/// Result of looking up a level by number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelLookup<'a> {
    /// The level exists in the table.
    Configured(&'a LevelConfig),
    /// The requested level lies past the end of the table.
    AllLevelsCompleted,
}

/// Reasons a level table cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelTableError {
    /// A table must contain at least one level.
    #[error("level table must contain at least one level")]
    Empty,
}

impl LevelTable {
    /// Creates a table from the provided configurations, in play order.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelTableError> {
        if levels.is_empty() {
            return Err(LevelTableError::Empty);
        }
        Ok(Self { levels })
    }

    /// Table containing the shipped level progression.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            levels: REFERENCE_LEVELS.to_vec(),
        }
    }

    /// Configuration of the first level.
    #[must_use]
    pub fn first(&self) -> &LevelConfig {
        &self.levels[0]
    }

    /// Looks up a level by its one-based number.
    #[must_use]
    pub fn lookup(&self, level: LevelNumber) -> LevelLookup<'_> {
        match level.index().and_then(|index| self.levels.get(index)) {
            Some(config) => LevelLookup::Configured(config),
            None => LevelLookup::AllLevelsCompleted,
        }
    }

    /// Number of levels in the table. Never zero.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
