use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::game::{Bounds, GameStatus, MarkerStatus, MARKER_SIZE};
use crate::{util, App};

// Terminal cells are taller than they are wide; mapping one column to 10
// board units and one row to 20 keeps marker footprints roughly square.
const UNITS_PER_COL: f64 = 10.0;
const UNITS_PER_ROW: f64 = 20.0;

const MARKER_COLS: u16 = (MARKER_SIZE / UNITS_PER_COL) as u16;
const MARKER_ROWS: u16 = (MARKER_SIZE / UNITS_PER_ROW) as u16;

/// Board-unit bounds of a drawn board rectangle. This is what a new round
/// samples marker positions against.
pub fn board_bounds(area: Rect) -> Bounds {
    Bounds {
        width: area.width as f64 * UNITS_PER_COL,
        height: area.height as f64 * UNITS_PER_ROW,
    }
}

pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(1), // title + status banner
            Constraint::Length(1), // points field
            Constraint::Length(1), // clock
            Constraint::Length(1), // key help
            Constraint::Min(3),    // board
        ])
        .split(f.area());

    f.render_widget(header_line(app, chunks[0].width), chunks[0]);

    let points = Line::from(vec![
        Span::styled("Points: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.count_input.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::DIM)),
    ]);
    f.render_widget(Paragraph::new(points), chunks[1]);

    let clock = Line::from(vec![
        Span::styled("Time: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(util::format_elapsed(app.game.elapsed_ms())),
    ]);
    f.render_widget(Paragraph::new(clock), chunks[2]);

    let help = if app.game.can_start() {
        "(enter) restart / (0-9) set points / (esc) quit"
    } else {
        "enter a point count to enable restart / (esc) quit"
    };
    f.render_widget(
        Paragraph::new(help).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ),
        chunks[3],
    );

    let board = Block::default()
        .borders(Borders::ALL)
        .title(app.game.status().to_string().to_lowercase());
    let inner = board.inner(chunks[4]);
    f.render_widget(board, chunks[4]);
    app.board_area = Some(inner);

    // Smaller identifiers stack on top, so paint them last.
    for marker in app
        .game
        .markers()
        .iter()
        .filter(|m| m.status != MarkerStatus::Hidden)
        .sorted_by_key(|m| std::cmp::Reverse(m.id))
    {
        let style = match marker.status {
            MarkerStatus::Pending => Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            MarkerStatus::Fading => Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Gray)
                .add_modifier(Modifier::DIM),
            MarkerStatus::Hidden => continue,
        };

        let cell = Rect::new(
            inner.x + (marker.pos.x / UNITS_PER_COL) as u16,
            inner.y + (marker.pos.y / UNITS_PER_ROW) as u16,
            MARKER_COLS,
            MARKER_ROWS,
        )
        .intersection(inner);
        if cell.is_empty() {
            continue;
        }

        f.render_widget(
            Paragraph::new(marker.id.to_string())
                .alignment(Alignment::Center)
                .style(style),
            cell,
        );
    }
}

/// Finds the marker a click at terminal cell (column, row) lands on: the
/// topmost (smallest id) non-hidden marker whose footprint contains the
/// click point, or None when the click misses the board entirely.
pub fn marker_at(app: &App, column: u16, row: u16) -> Option<u32> {
    let area = app.board_area?;
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }

    // Hit-test against the centre of the clicked cell, in board units.
    let u = (column - area.x) as f64 * UNITS_PER_COL + UNITS_PER_COL / 2.0;
    let v = (row - area.y) as f64 * UNITS_PER_ROW + UNITS_PER_ROW / 2.0;

    app.game
        .markers()
        .iter()
        .filter(|m| m.status != MarkerStatus::Hidden)
        .filter(|m| {
            u >= m.pos.x && u < m.pos.x + MARKER_SIZE && v >= m.pos.y && v < m.pos.y + MARKER_SIZE
        })
        .map(|m| m.id)
        .min()
}

fn header_line(app: &App, width: u16) -> Paragraph<'static> {
    let title = "LET'S PLAY";
    let (banner, banner_style) = match app.game.status() {
        GameStatus::Won => (
            "ALL CLEARED",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        GameStatus::Lost => (
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        GameStatus::Playing | GameStatus::Idle => ("", Style::default()),
    };

    let pad = (width as usize).saturating_sub(title.width() + banner.width());
    Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(pad)),
        Span::styled(banner, banner_style),
    ]))
}
