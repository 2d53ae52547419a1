//! Level progression loaded from TOML files.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tile_rush_core::{LevelConfig, MoveBudget};
use tile_rush_world::levels::LevelTable;

const SUPPORTED_LEVEL_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    version: u32,
    levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelEntry {
    score_target: u64,
    time_limit_seconds: u32,
    #[serde(default)]
    move_limit: Option<u32>,
}

/// Reads and validates the level file at `path`.
pub(crate) fn load_level_table(path: &Path) -> Result<LevelTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    parse_level_table(&contents)
        .with_context(|| format!("invalid level file at {}", path.display()))
}

fn parse_level_table(contents: &str) -> Result<LevelTable> {
    let file: LevelFile =
        toml::from_str(contents).context("failed to parse level file toml contents")?;
    if file.version != SUPPORTED_LEVEL_FILE_VERSION {
        bail!(
            "unsupported level file version {}; expected {}",
            file.version,
            SUPPORTED_LEVEL_FILE_VERSION
        );
    }

    let mut levels = Vec::with_capacity(file.levels.len());
    for (index, entry) in file.levels.into_iter().enumerate() {
        if entry.time_limit_seconds == 0 {
            bail!("level {} must allow at least one second", index + 1);
        }
        if entry.move_limit == Some(0) {
            bail!("level {} must allow at least one move", index + 1);
        }
        if entry.score_target == 0 {
            bail!("level {} must have a positive score target", index + 1);
        }
        levels.push(LevelConfig::new(
            entry.score_target,
            entry.time_limit_seconds,
            MoveBudget::from(entry.move_limit),
        ));
    }

    LevelTable::new(levels).context("level file defines no levels")
}
