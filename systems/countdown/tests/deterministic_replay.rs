use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use tile_rush_core::{Command, Direction, Event, LevelConfig, MoveBudget};
use tile_rush_system_countdown::Countdown;
use tile_rush_world::{self as world, levels::LevelTable, query, World};

const SEED: u64 = 0x7a1e_5eed;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, EventRecord::ClockTicked { .. })));
}

#[test]
fn replay_counts_down_one_second_per_elapsed_second() {
    let outcome = replay(vec![
        Command::Tick {
            dt: Duration::from_millis(1_500),
        },
        Command::Tick {
            dt: Duration::from_millis(1_500),
        },
    ]);

    assert_eq!(outcome.time_remaining, 27);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let table = LevelTable::new(vec![
        LevelConfig::new(64, 30, MoveBudget::Unbounded),
        LevelConfig::new(128, 30, MoveBudget::Bounded(60)),
    ])
    .expect("non-empty table");
    let mut world = World::new(table, SEED);
    let mut countdown = Countdown::default();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events).expect("command accepted");
        record_events(&events, &mut log);
        process_countdown(&mut world, &mut countdown, events, &mut log);
    }

    ReplayOutcome {
        grid: query::grid(&world).values(),
        score: query::score(&world),
        time_remaining: query::time_remaining(&world),
        events: log,
    }
}

fn process_countdown(
    world: &mut World,
    countdown: &mut Countdown,
    pending_events: Vec<Event>,
    log: &mut Vec<EventRecord>,
) {
    let mut commands = Vec::new();
    countdown.handle(
        &pending_events,
        query::phase(world),
        query::clock_state(world),
        &mut commands,
    );

    for command in commands {
        let mut generated_events = Vec::new();
        world::apply(world, command, &mut generated_events).expect("tick accepted");
        record_events(&generated_events, log);
    }
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().filter_map(EventRecord::from_event));
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for (index, direction) in Direction::ALL.iter().cycle().take(48).enumerate() {
        commands.push(Command::Move {
            direction: *direction,
        });
        if index % 4 == 0 {
            commands.push(Command::Tick {
                dt: Duration::from_millis(700),
            });
        }
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    grid: [[u32; 4]; 4],
    score: u64,
    time_remaining: u32,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    ClockTicked { time_remaining: u32 },
    TileSpawned { column: u32, row: u32, value: u32 },
    GridShifted {
        direction: Direction,
        score_delta: u64,
    },
    LevelCompleted { level: u32 },
}

impl EventRecord {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::ClockTicked { time_remaining } => Some(Self::ClockTicked {
                time_remaining: *time_remaining,
            }),
            Event::TileSpawned { cell, tile } => Some(Self::TileSpawned {
                column: cell.column(),
                row: cell.row(),
                value: tile.value(),
            }),
            Event::GridShifted {
                direction,
                score_delta,
            } => Some(Self::GridShifted {
                direction: *direction,
                score_delta: *score_delta,
            }),
            Event::LevelCompleted { level } => Some(Self::LevelCompleted {
                level: level.get(),
            }),
            _ => None,
        }
    }
}
