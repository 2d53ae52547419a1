use std::time::Duration;

use tile_rush_core::{ClockState, Command, Event, LevelNumber, SessionPhase};
use tile_rush_system_countdown::{Config, Countdown};

fn elapsed(millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }
}

#[test]
fn emits_one_tick_per_whole_second() {
    let mut countdown = Countdown::default();
    let mut commands = Vec::new();

    countdown.handle(
        &[elapsed(2_500)],
        SessionPhase::Active,
        ClockState::Running,
        &mut commands,
    );

    assert_eq!(commands, vec![Command::ElapseSecond, Command::ElapseSecond]);
    assert_eq!(countdown.pending(), Duration::from_millis(500));
}

#[test]
fn partial_seconds_carry_over_between_frames() {
    let mut countdown = Countdown::new(Config::new(Duration::from_secs(1)));
    let mut commands = Vec::new();

    for _ in 0..3 {
        countdown.handle(
            &[elapsed(400)],
            SessionPhase::Active,
            ClockState::Running,
            &mut commands,
        );
    }

    assert_eq!(commands, vec![Command::ElapseSecond]);
    assert_eq!(countdown.pending(), Duration::from_millis(200));
}

#[test]
fn paused_clock_discards_elapsed_time() {
    let mut countdown = Countdown::default();
    let mut commands = Vec::new();

    countdown.handle(
        &[elapsed(900)],
        SessionPhase::Active,
        ClockState::Running,
        &mut commands,
    );
    countdown.handle(
        &[elapsed(5_000)],
        SessionPhase::Active,
        ClockState::Paused,
        &mut commands,
    );
    assert!(commands.is_empty(), "no tick may be counted while paused");
    assert_eq!(countdown.pending(), Duration::ZERO);

    countdown.handle(
        &[elapsed(900)],
        SessionPhase::Active,
        ClockState::Running,
        &mut commands,
    );
    assert!(commands.is_empty(), "resume waits a full second");
}

#[test]
fn inactive_phases_emit_nothing() {
    let mut countdown = Countdown::default();
    let mut commands = Vec::new();

    for phase in [
        SessionPhase::LevelComplete,
        SessionPhase::GameOver,
        SessionPhase::AllLevelsComplete,
    ] {
        countdown.handle(&[elapsed(3_000)], phase, ClockState::Running, &mut commands);
    }

    assert!(commands.is_empty());
}

#[test]
fn level_start_restarts_the_period() {
    let mut countdown = Countdown::default();
    let mut commands = Vec::new();

    countdown.handle(
        &[elapsed(800)],
        SessionPhase::Active,
        ClockState::Running,
        &mut commands,
    );
    countdown.handle(
        &[
            Event::LevelStarted {
                level: LevelNumber::new(2),
            },
            elapsed(300),
        ],
        SessionPhase::Active,
        ClockState::Running,
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(countdown.pending(), Duration::from_millis(300));
}
