#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Tile Rush experience.

use tile_rush_core::Grid;
use tile_rush_world::{query, query::SessionSnapshot, World};

/// Produces data required to greet the player and draw the session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the board required for rendering.
    #[must_use]
    pub fn grid<'world>(&self, world: &'world World) -> &'world Grid {
        query::grid(world)
    }

    /// Captures the values a render sink displays after every state change.
    #[must_use]
    pub fn session(&self, world: &World) -> SessionSnapshot {
        query::snapshot(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_rush_core::{MoveBudget, SessionPhase, WELCOME_BANNER};
    use tile_rush_world::levels::LevelTable;

    #[test]
    fn session_reflects_fresh_world() {
        let world = World::new(LevelTable::reference(), 42);
        let bootstrap = Bootstrap;

        assert_eq!(bootstrap.welcome_banner(&world), WELCOME_BANNER);

        let session = bootstrap.session(&world);
        assert_eq!(session.grid, *bootstrap.grid(&world));
        assert_eq!(session.score_target, 300);
        assert_eq!(session.time_remaining, 30);
        assert_eq!(session.moves_remaining, MoveBudget::Unbounded);
        assert_eq!(session.phase, SessionPhase::Active);
    }
}
