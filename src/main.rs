use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use punkt::{
    config::{Config, ConfigStore, FileConfigStore},
    game::{ClickOutcome, TICK_RATE_MS},
    runtime::{schedule_hide, CrosstermEventSource, FixedTicker, GameEvent, Runner},
    ui, App, Cli,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let number_of_points = cli.points.unwrap_or_else(|| store.load().number_of_points);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(number_of_points);
    let result = start_tui(&mut terminal, &mut app);

    // Remember the last configured count for the next launch
    let _ = store.save(&Config {
        number_of_points: app.game.marker_count(),
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            GameEvent::Tick => app.game.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Hide { round_seq, id } => {
                app.game.apply_hide(round_seq, id);
            }
            GameEvent::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    if let Some(id) = ui::marker_at(app, mouse.column, mouse.row) {
                        match app.game.click(id) {
                            ClickOutcome::Advanced | ClickOutcome::Won => {
                                schedule_hide(runner.sender(), app.game.round_seq(), id);
                            }
                            ClickOutcome::Lost | ClickOutcome::Ignored => {}
                        }
                    }
                }
            }
            GameEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Enter => {
                    app.restart();
                }
                KeyCode::Backspace => app.pop_count_digit(),
                KeyCode::Char(c) if c.is_ascii_digit() => app.push_count_digit(c),
                KeyCode::Char('r') => {
                    app.restart();
                }
                KeyCode::Char('q') => break,
                _ => {}
            },
        }
    }

    Ok(())
}
