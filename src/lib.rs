// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only concerns in main.rs.
pub mod config;
pub mod game;
pub mod round_generator;
pub mod runtime;
pub mod ui;
pub mod util;

use clap::Parser;
use ratatui::layout::Rect;

use crate::game::Game;

/// terminal point-sequencing game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal point-sequencing game: numbered markers land at random spots on the board and must be clicked in ascending order before a single misclick ends the round. A 100ms clock keeps the score honest."
)]
pub struct Cli {
    /// number of points to place on the board (overrides the stored config)
    #[clap(short = 'p', long)]
    pub points: Option<u32>,
}

/// Presentation-layer state: the engine plus the numeric count field and the
/// board rectangle recorded by the last draw (used for click hit-testing and
/// for sizing the next round).
#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub count_input: String,
    pub board_area: Option<Rect>,
}

impl App {
    pub fn new(number_of_points: u32) -> Self {
        Self {
            game: Game::new(number_of_points),
            count_input: number_of_points.to_string(),
            board_area: None,
        }
    }

    /// Pushes the count field into the engine. Malformed or empty input
    /// configures a zero count, which disables starting.
    pub fn apply_count_input(&mut self) {
        let count = util::parse_count(&self.count_input).unwrap_or(0);
        self.game.set_marker_count(count);
    }

    pub fn push_count_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.count_input.len() < 4 {
            self.count_input.push(c);
            self.apply_count_input();
        }
    }

    pub fn pop_count_digit(&mut self) {
        self.count_input.pop();
        self.apply_count_input();
    }

    /// Starts a round sized to the most recently drawn board. Returns false
    /// when nothing has been drawn yet or the configured count is zero.
    pub fn restart(&mut self) -> bool {
        match self.board_area {
            Some(area) => self.game.start_round(ui::board_bounds(area)),
            None => false,
        }
    }
}
