use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use verne_engine::{Backdrop, Engine, Transcript};

/// State of the play screen.
pub struct PlayApp {
    pub engine: Engine,
    pub transcript: Transcript,
    /// Current input text.
    pub input_text: String,
    /// Cursor position within input text (byte offset).
    pub input_cursor: usize,
    /// Scroll offset from the bottom.
    pub output_scroll: u16,
    pub should_quit: bool,
}

impl PlayApp {
    pub fn new(mut engine: Engine) -> Self {
        let mut transcript = Transcript::new();
        engine.start(&mut transcript);
        Self {
            engine,
            transcript,
            input_text: String::new(),
            input_cursor: 0,
            output_scroll: 0,
            should_quit: false,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.engine.config().tick_interval
    }

    pub fn tick(&mut self) {
        self.engine.tick(&mut self.transcript);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.engine.is_ended() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Tab => self.complete_input(),
            KeyCode::Esc => {
                if self.engine.is_busy() {
                    self.engine.skip(&mut self.transcript);
                } else {
                    self.input_text.clear();
                    self.input_cursor = 0;
                }
            }
            KeyCode::Backspace => {
                if self.input_cursor > 0 {
                    let prev = self.prev_boundary();
                    self.input_text.remove(prev);
                    self.input_cursor = prev;
                }
            }
            KeyCode::Left => self.input_cursor = self.prev_boundary(),
            KeyCode::Right => {
                if self.input_cursor < self.input_text.len() {
                    let next = self.input_text[self.input_cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.input_cursor + i)
                        .unwrap_or(self.input_text.len());
                    self.input_cursor = next;
                }
            }
            KeyCode::Home => self.input_cursor = 0,
            KeyCode::End => self.input_cursor = self.input_text.len(),
            KeyCode::Up => self.output_scroll = self.output_scroll.saturating_add(1),
            KeyCode::Down => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::Char(c) => {
                self.input_text.insert(self.input_cursor, c);
                self.input_cursor += c.len_utf8();
            }
            _ => {}
        }
    }

    fn prev_boundary(&self) -> usize {
        self.input_text[..self.input_cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input_text);
        self.input_cursor = 0;
        self.output_scroll = 0;
        self.engine.submit(&mut self.transcript, &input);
    }

    fn complete_input(&mut self) {
        if let Some(word) = self.engine.complete(&self.input_text) {
            self.input_cursor = word.len();
            self.input_text = word;
        }
    }

    /// Backdrop image for the room on screen.
    pub fn backdrop_path(&self) -> Option<String> {
        self.transcript.backdrop().map(backdrop_asset)
    }
}

/// `rooms/<sanitized id>/<before|after>.png`.
pub fn backdrop_asset(backdrop: &Backdrop) -> String {
    let state = if backdrop.transformed { "after" } else { "before" };
    format!("rooms/{}/{state}.png", sanitize_for_filename(&backdrop.room))
}

/// Lower-case, whitespace runs become `_`, anything else outside
/// `[a-z0-9_]` is dropped.
pub fn sanitize_for_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
        }
    }
    out
}
