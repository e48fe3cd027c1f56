use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use verne_core::{Mode, Run};

use super::app::PlayApp;

pub fn draw(frame: &mut Frame, app: &PlayApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(3),    // Output
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title(frame, app, chunks[0]);
    draw_output(frame, app, chunks[1]);
    draw_input(frame, app, chunks[2]);

    let status = Paragraph::new(status_hint(app))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[3]);
}

fn draw_title(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let room = &app.engine.state().current_room;
    let mut spans = vec![Span::styled(
        format!(" {room} "),
        Style::default().fg(Color::Cyan).bold(),
    )];
    if let Some(path) = app.backdrop_path() {
        spans.push(Span::styled(path, Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Split styled blocks into display lines. A block may hold line breaks.
fn block_lines(blocks: &[Vec<Run>]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for runs in blocks {
        let mut current: Vec<Span<'static>> = Vec::new();
        for run in runs {
            let style = if run.bold {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut parts = run.text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    current.push(Span::styled(part.to_string(), style));
                }
                if parts.peek().is_some() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
            }
        }
        lines.push(Line::from(current));
    }
    lines
}

fn draw_output(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let lines = block_lines(app.transcript.blocks());

    let inner_width = area.width.saturating_sub(2) as usize;
    let total_wrapped: u16 = lines
        .iter()
        .map(|l| {
            let len = l.width();
            if inner_width == 0 {
                1
            } else {
                len.max(1).div_ceil(inner_width) as u16
            }
        })
        .sum();

    let visible_height = area.height.saturating_sub(2);
    let max_scroll = total_wrapped.saturating_sub(visible_height);
    let scroll = max_scroll.saturating_sub(app.output_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Verne ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let title = match app.engine.mode() {
        Mode::AwaitingRiddleAnswer(_) => " Enter your answer ",
        Mode::AwaitingEnter => " Press ENTER ",
        Mode::Ended(_) => " The end ",
        Mode::Normal => "",
    };
    let input = Paragraph::new(format!("> {}", app.input_text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(input, area);

    if app.engine.is_ended() {
        return;
    }
    let cursor_col = app.input_text[..app.input_cursor].chars().count() as u16;
    let cursor_x = area.x + 1 + 2 + cursor_col;
    let cursor_y = area.y + 1;
    if cursor_x < area.x + area.width - 1 {
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn status_hint(app: &PlayApp) -> String {
    if app.engine.is_ended() {
        return " Enter/Esc:leave".to_string();
    }
    let actions = app.engine.available_actions();
    let keys = "Enter:send  Tab:complete  Esc:skip  \u{2191}\u{2193}:scroll  Ctrl+C:quit";
    if actions.is_empty() {
        format!(" {keys}")
    } else {
        format!(" [{}]  {keys}", actions.join(" "))
    }
}
