//! Drives the world and its systems from frame input.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use tile_rush_core::{ClockState, Command, Event, SessionPhase};
use tile_rush_rendering::{BoardPresentation, FrameInput, HudPresentation, Notification, Scene};
use tile_rush_system_bootstrap::Bootstrap;
use tile_rush_system_countdown::Countdown;
use tile_rush_world::{self as world, query, World};

/// Owns the session and every system that reacts to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    countdown: Countdown,
    bootstrap: Bootstrap,
    notification: Option<Notification>,
}

impl Simulation {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            countdown: Countdown::default(),
            bootstrap: Bootstrap,
            notification: None,
        }
    }

    pub(crate) fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Feeds elapsed time first, then the player's requests for this frame.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) -> Result<()> {
        self.execute(Command::Tick { dt })?;

        if input.pause_toggle {
            let command = if query::is_paused(&self.world) {
                Command::Resume
            } else {
                Command::Pause
            };
            self.execute(command)?;
        }

        if input.acknowledge {
            if let Some(command) = self.acknowledgement() {
                self.execute(command)?;
            }
        }

        if let Some(direction) = input.direction {
            self.execute(Command::Move { direction })?;
        }

        Ok(())
    }

    pub(crate) fn scene(&self) -> Result<Scene> {
        let session = self.bootstrap.session(&self.world);
        let board = BoardPresentation::new(&session.grid, BoardPresentation::DEFAULT_CELL_WIDTH)?;
        let hud = HudPresentation::new(
            session.level,
            session.score,
            session.score_target,
            session.time_remaining,
            session.moves_remaining,
            session.clock == ClockState::Paused,
        );
        Ok(Scene::new(board, hud, self.notification))
    }

    fn acknowledgement(&self) -> Option<Command> {
        match query::phase(&self.world) {
            SessionPhase::LevelComplete => Some(Command::AdvanceLevel),
            SessionPhase::GameOver => Some(Command::ResetToLevelOne),
            SessionPhase::Active | SessionPhase::AllLevelsComplete => None,
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command.clone(), &mut events)
            .with_context(|| format!("world rejected {command:?}"))?;
        self.observe(&events);

        let mut commands = Vec::new();
        self.countdown.handle(
            &events,
            query::phase(&self.world),
            query::clock_state(&self.world),
            &mut commands,
        );

        for command in commands {
            let mut generated_events = Vec::new();
            world::apply(&mut self.world, command, &mut generated_events)
                .context("world rejected countdown tick")?;
            self.observe(&generated_events);
        }

        Ok(())
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            debug!(?event, "world event");
            if let Some(notification) = Notification::from_event(event) {
                info!(message = %notification.message(), "notification raised");
                self.notification = Some(notification);
            } else if matches!(event, Event::LevelStarted { .. }) {
                self.notification = None;
            }
        }
    }
}
