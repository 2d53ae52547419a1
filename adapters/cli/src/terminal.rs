//! Line-oriented terminal backend.
//!
//! Player input is read on a dedicated thread so the countdown keeps running
//! while the terminal waits for the next line. The board is redrawn whenever
//! the scene changes.

use std::{
    io::{BufRead, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use tile_rush_rendering::{
    BoardPresentation, CellPresentation, Color, FrameInput, Notification, Presentation,
    RenderingBackend, Scene,
};
use tracing::debug;

use crate::input::{parse_line, InputAction};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[H";
const RESET: &str = "\u{1b}[0m";
const HELP: &str = "Move: w/a/s/d, h/j/k/l or arrows. p: pause. n: continue. q: quit.";

/// Renders scenes as text and reads commands one line at a time.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
    color: bool,
    poll_interval: Duration,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    pub(crate) fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Enables or disables ANSI colors and screen clearing.
    #[must_use]
    pub(crate) fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Result<()>,
    {
        let Self {
            input,
            mut output,
            color,
            poll_interval,
        } = self;
        let Presentation {
            window_title,
            clear_color,
            mut scene,
        } = presentation;
        let painter = Painter {
            title: window_title,
            clear_color,
            color,
        };

        let lines = spawn_reader(input);
        painter.draw(&mut output, &scene)?;
        let mut drawn = scene.clone();
        let mut last_frame = Instant::now();

        while !scene.is_finished() {
            let frame = match lines.recv_timeout(poll_interval) {
                Ok(line) => match parse_line(&line) {
                    InputAction::Frame(frame) => frame,
                    InputAction::Quit => {
                        debug!("quit requested");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => FrameInput::default(),
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("input closed");
                    break;
                }
            };

            let now = Instant::now();
            let dt = now.saturating_duration_since(last_frame);
            last_frame = now;

            update_scene(dt, frame, &mut scene)?;
            if scene != drawn {
                painter.draw(&mut output, &scene)?;
                drawn = scene.clone();
            }
        }

        output.flush().context("failed to flush terminal output")
    }
}

fn spawn_reader<R>(mut input: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let _reader = thread::spawn(move || loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if sender.send(line).is_err() {
                    break;
                }
            }
        }
    });
    receiver
}

struct Painter {
    title: String,
    clear_color: Color,
    color: bool,
}

impl Painter {
    fn draw<W: Write>(&self, output: &mut W, scene: &Scene) -> Result<()> {
        let text = self.render(scene);
        output
            .write_all(text.as_bytes())
            .context("failed to write frame to terminal")?;
        output.flush().context("failed to flush terminal output")
    }

    fn render(&self, scene: &Scene) -> String {
        let mut text = String::new();
        if self.color {
            text.push_str(CLEAR_SCREEN);
            text.push_str(&paint(&format!(" {} ", self.title), self.clear_color, None));
        } else {
            text.push_str(&self.title);
        }
        text.push('\n');

        let hud = &scene.hud;
        text.push_str(&format!(
            "Level {}  Score {}/{}  Time {}  Moves {}{}\n",
            hud.level,
            hud.score,
            hud.score_target,
            hud.time_remaining,
            hud.moves_remaining,
            if hud.paused { "  [PAUSED]" } else { "" }
        ));

        self.render_board(&scene.board, &mut text);

        if let Some(notification) = scene.notification {
            text.push_str(&notification.message());
            text.push_str(acknowledgement_hint(notification));
            text.push('\n');
        }
        text.push_str(HELP);
        text.push('\n');
        text
    }

    fn render_board(&self, board: &BoardPresentation, text: &mut String) {
        let width = board.cell_width as usize;
        let rows = board
            .cells
            .iter()
            .map(|cell| cell.cell.row())
            .max()
            .map_or(0, |row| row + 1);

        for row in 0..rows {
            for cell in board.row(row) {
                text.push_str(&self.render_cell(cell, width));
            }
            text.push('\n');
        }
    }

    fn render_cell(&self, cell: &CellPresentation, width: usize) -> String {
        let label = if cell.tile.is_empty() && !self.color {
            ".".to_owned()
        } else {
            cell.label()
        };
        let padded = format!("{label:^width$}");
        if self.color {
            paint(&padded, cell.fill, Some(cell.text))
        } else {
            format!("[{padded}]")
        }
    }
}

fn acknowledgement_hint(notification: Notification) -> &'static str {
    match notification {
        Notification::LevelCompleted { .. } => " Press n to continue.",
        Notification::GameOver { .. } => " Press r to restart from level 1.",
        Notification::AllLevelsCompleted => "",
    }
}

fn paint(text: &str, background: Color, foreground: Option<Color>) -> String {
    let (red, green, blue) = background.to_rgb_u8();
    let mut painted = format!("\u{1b}[48;2;{red};{green};{blue}m");
    if let Some(foreground) = foreground {
        let (red, green, blue) = foreground.to_rgb_u8();
        painted.push_str(&format!("\u{1b}[38;2;{red};{green};{blue}m"));
    }
    painted.push_str(text);
    painted.push_str(RESET);
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tile_rush_core::{Grid, LevelNumber, MoveBudget};
    use tile_rush_rendering::HudPresentation;

    fn scene(grid: &Grid) -> Scene {
        let board = BoardPresentation::new(grid, 4).expect("valid width");
        let hud =
            HudPresentation::new(LevelNumber::first(), 12, 300, 30, MoveBudget::Unbounded, false);
        Scene::new(board, hud, None)
    }

    fn presentation(grid: &Grid) -> Presentation {
        Presentation::new("Tile Rush", Color::from_rgb_u8(0xbb, 0xad, 0xa0), scene(grid))
    }

    #[test]
    fn plain_render_lists_hud_and_board() {
        let painter = Painter {
            title: "Tile Rush".to_owned(),
            clear_color: Color::from_rgb_u8(0, 0, 0),
            color: false,
        };
        let grid = Grid::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]);
        let text = painter.render(&scene(&grid));

        assert!(text.starts_with("Tile Rush\n"));
        assert!(text.contains("Level 1  Score 12/300  Time 0:30  Moves Unlimited\n"));
        assert!(text.contains("[ 2  ][ .  ][ .  ][ .  ]\n"));
        assert!(text.contains("[ .  ][ .  ][ .  ][2048]\n"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn notifications_carry_acknowledgement_hints() {
        let painter = Painter {
            title: "Tile Rush".to_owned(),
            clear_color: Color::from_rgb_u8(0, 0, 0),
            color: false,
        };
        let mut scene = scene(&Grid::empty());
        scene.notification = Some(Notification::LevelCompleted {
            level: LevelNumber::first(),
        });
        assert!(painter
            .render(&scene)
            .contains("Level 1 complete! Press n to continue."));
    }

    #[test]
    fn colored_render_uses_truecolor_escapes() {
        let painter = Painter {
            title: "Tile Rush".to_owned(),
            clear_color: Color::from_rgb_u8(0xbb, 0xad, 0xa0),
            color: true,
        };
        let text = painter.render(&scene(&Grid::empty()));
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains("\u{1b}[48;2;187;173;160m Tile Rush "));
    }

    #[test]
    fn run_forwards_lines_until_quit() {
        let input = Cursor::new(b"w\np\nq\nd\n".to_vec());
        let mut output = Vec::new();
        let mut received = Vec::new();

        TerminalBackend::new(input, &mut output)
            .with_color(false)
            .run(presentation(&Grid::empty()), |_, frame, scene| {
                if frame != FrameInput::default() {
                    received.push(frame);
                }
                scene.hud.paused = frame.pause_toggle || scene.hud.paused;
                Ok(())
            })
            .expect("backend runs");

        assert_eq!(received.len(), 2);
        assert_eq!(received[0].direction, Some(tile_rush_core::Direction::Up));
        assert!(received[1].pause_toggle);

        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.contains("[PAUSED]"));
    }

    #[test]
    fn run_stops_once_the_session_is_finished() {
        let input = Cursor::new(b"n\nw\nw\n".to_vec());
        let mut output = Vec::new();
        let mut frames = 0;

        TerminalBackend::new(input, &mut output)
            .with_color(false)
            .run(presentation(&Grid::empty()), |_, frame, scene| {
                if frame.acknowledge {
                    scene.notification = Some(Notification::AllLevelsCompleted);
                }
                if frame.direction.is_some() {
                    frames += 1;
                }
                Ok(())
            })
            .expect("backend runs");

        assert_eq!(frames, 0);
        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.contains("You have completed all levels!"));
    }

    #[test]
    fn closure_errors_stop_the_backend() {
        let input = Cursor::new(b"w\n".to_vec());
        let error = TerminalBackend::new(input, Vec::new())
            .with_color(false)
            .run(presentation(&Grid::empty()), |_, frame, _| {
                if frame.direction.is_some() {
                    anyhow::bail!("simulation failed");
                }
                Ok(())
            })
            .expect_err("closure error propagates");
        assert_eq!(error.to_string(), "simulation failed");
    }
}
