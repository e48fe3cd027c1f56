mod app;
mod view;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use verne_engine::Engine;

use app::PlayApp;

/// Poll interval when the typewriter effect is disabled.
const IDLE_POLL: Duration = Duration::from_millis(100);

pub fn run(engine: Engine) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let mut app = PlayApp::new(engine);

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Draw, then wait one tick for a key. A tick without a key advances the
/// typewriter by one character.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PlayApp,
) -> Result<(), String> {
    let tick = app.tick_interval();
    let timeout = if tick.is_zero() { IDLE_POLL } else { tick };

    loop {
        terminal
            .draw(|frame| view::draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))?
                && key.kind == KeyEventKind::Press
            {
                app.handle_key(key);
            }
        } else {
            app.tick();
        }
    }
}
