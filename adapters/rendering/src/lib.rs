#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Rush adapters.

use anyhow::Result as AnyResult;
use std::{error::Error, fmt, time::Duration};
use tile_rush_core::{
    CellCoord, Direction, Event, GameOverReason, Grid, LevelNumber, MoveBudget, Tile,
};

/// Tile values that receive a dedicated palette entry, in ascending order.
const PALETTE: [(u32, Color); 11] = [
    (2, Color::from_rgb_u8(0xee, 0xe4, 0xda)),
    (4, Color::from_rgb_u8(0xed, 0xe0, 0xc8)),
    (8, Color::from_rgb_u8(0xf2, 0xb1, 0x79)),
    (16, Color::from_rgb_u8(0xf5, 0x95, 0x63)),
    (32, Color::from_rgb_u8(0xf6, 0x7c, 0x5f)),
    (64, Color::from_rgb_u8(0xf6, 0x5e, 0x3b)),
    (128, Color::from_rgb_u8(0xed, 0xcf, 0x72)),
    (256, Color::from_rgb_u8(0xed, 0xcc, 0x61)),
    (512, Color::from_rgb_u8(0xed, 0xc8, 0x50)),
    (1_024, Color::from_rgb_u8(0xed, 0xc5, 0x3f)),
    (2_048, Color::from_rgb_u8(0xed, 0xc2, 0x2e)),
];
const EMPTY_CELL_COLOR: Color = Color::from_rgb_u8(0xcd, 0xc1, 0xb4);
const OVERFLOW_COLOR: Color = Color::from_rgb_u8(0x3c, 0x3a, 0x32);
const DARK_TEXT: Color = Color::from_rgb_u8(0x77, 0x6e, 0x65);
const LIGHT_TEXT: Color = Color::from_rgb_u8(0xf9, 0xf6, 0xf2);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, rounding each floating point intensity.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill color used for a tile.
#[must_use]
pub fn tile_color(tile: Tile) -> Color {
    if tile.is_empty() {
        return EMPTY_CELL_COLOR;
    }

    PALETTE
        .iter()
        .find(|(value, _)| *value == tile.value())
        .map_or(OVERFLOW_COLOR, |(_, color)| *color)
}

/// Label color that stays legible on top of [`tile_color`].
#[must_use]
pub fn tile_text_color(tile: Tile) -> Color {
    if tile.value() <= 4 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_time_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a move budget, rendering the unbounded budget as `Unlimited`.
#[must_use]
pub fn format_moves_remaining(moves: MoveBudget) -> String {
    moves.to_string()
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction requested by the player on this frame.
    pub direction: Option<Direction>,
    /// Whether the adapter detected a pause toggle on this frame.
    pub pause_toggle: bool,
    /// Whether the player acknowledged the pending notification on this frame.
    pub acknowledge: bool,
}

/// Single board cell ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct CellPresentation {
    /// Location of the cell on the board.
    pub cell: CellCoord,
    /// Tile held by the cell.
    pub tile: Tile,
    /// Background color of the cell.
    pub fill: Color,
    /// Color of the value label.
    pub text: Color,
}

impl CellPresentation {
    /// Describes the provided cell and tile using the shared palette.
    #[must_use]
    pub fn new(cell: CellCoord, tile: Tile) -> Self {
        Self {
            cell,
            tile,
            fill: tile_color(tile),
            text: tile_text_color(tile),
        }
    }

    /// Text drawn inside the cell; empty cells carry no label.
    #[must_use]
    pub fn label(&self) -> String {
        if self.tile.is_empty() {
            String::new()
        } else {
            self.tile.value().to_string()
        }
    }
}

/// Board contents laid out row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Cells in row-major order.
    pub cells: Vec<CellPresentation>,
    /// Width of each cell in character columns or pixels, depending on the backend.
    pub cell_width: u32,
}

impl BoardPresentation {
    /// Default width used by text backends.
    pub const DEFAULT_CELL_WIDTH: u32 = 6;

    /// Describes the provided board. Rejects a zero `cell_width`.
    pub fn new(grid: &Grid, cell_width: u32) -> Result<Self, RenderingError> {
        if cell_width == 0 {
            return Err(RenderingError::InvalidCellWidth { cell_width });
        }

        Ok(Self {
            cells: grid
                .cells()
                .map(|(cell, tile)| CellPresentation::new(cell, tile))
                .collect(),
            cell_width,
        })
    }

    /// Cells of the provided row, left to right.
    pub fn row(&self, row: u32) -> impl Iterator<Item = &CellPresentation> {
        self.cells.iter().filter(move |cell| cell.cell.row() == row)
    }
}

/// Status line shown beside the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Level being played.
    pub level: LevelNumber,
    /// Score within the level.
    pub score: u64,
    /// Score required to complete the level.
    pub score_target: u64,
    /// Formatted countdown.
    pub time_remaining: String,
    /// Formatted move budget.
    pub moves_remaining: String,
    /// Whether the session is paused.
    pub paused: bool,
}

impl HudPresentation {
    /// Builds the status line from raw session values.
    #[must_use]
    pub fn new(
        level: LevelNumber,
        score: u64,
        score_target: u64,
        time_remaining: u32,
        moves_remaining: MoveBudget,
        paused: bool,
    ) -> Self {
        Self {
            level,
            score,
            score_target,
            time_remaining: format_time_remaining(time_remaining),
            moves_remaining: format_moves_remaining(moves_remaining),
            paused,
        }
    }
}

/// Message surfaced to the player when the session needs acknowledgement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    /// The level target was reached.
    LevelCompleted {
        /// Level that was completed.
        level: LevelNumber,
    },
    /// A budget ran out before the target was reached.
    GameOver {
        /// Budget that ran out.
        reason: GameOverReason,
    },
    /// Every level was completed.
    AllLevelsCompleted,
}

impl Notification {
    /// Extracts the notification carried by a world event, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::LevelCompleted { level } => Some(Self::LevelCompleted { level: *level }),
            Event::GameOver { reason } => Some(Self::GameOver { reason: *reason }),
            Event::AllLevelsCompleted => Some(Self::AllLevelsCompleted),
            _ => None,
        }
    }

    /// Human readable message for the notification.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::LevelCompleted { level } => format!("Level {level} complete!"),
            Self::GameOver { reason } => format!("Game over: {reason}."),
            Self::AllLevelsCompleted => "You have completed all levels!".to_owned(),
        }
    }

    /// Reports whether the session is finished once this notification appears.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::AllLevelsCompleted)
    }
}

/// Scene description combining the board, status line and pending message.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board contents.
    pub board: BoardPresentation,
    /// Status line.
    pub hud: HudPresentation,
    /// Message awaiting acknowledgement, if any.
    pub notification: Option<Notification>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        board: BoardPresentation,
        hud: HudPresentation,
        notification: Option<Notification>,
    ) -> Self {
        Self {
            board,
            hud,
            notification,
        }
    }

    /// Reports whether the session shown by the scene is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.notification
            .as_ref()
            .is_some_and(Notification::is_terminal)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tile Rush scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real time elapsed
    /// since the previous frame and the input captured by the adapter, and
    /// rewrites the scene before it is drawn again. Errors returned by the
    /// closure stop the backend and are propagated to the caller.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Cells must be at least one unit wide.
    InvalidCellWidth {
        /// Provided width that failed validation.
        cell_width: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellWidth { cell_width } => {
                write!(f, "cell_width must be positive (received {cell_width})")
            }
        }
    }
}

impl Error for RenderingError {}
