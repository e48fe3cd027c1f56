//! Room text markup.
//!
//! Content strings may contain `**bold**` spans and `<br>` line breaks. They
//! are parsed once into a flat sequence of styled [`Run`]s; renderers then
//! work on that structure instead of on the raw string, so a partially
//! revealed bold span is still a well-formed bold run.

use std::fmt;

use logos::Logos;

/// A stretch of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The text of the run. Never empty inside a [`Markup`].
    pub text: String,
    /// Whether the run is emphasised.
    pub bold: bool,
}

impl Run {
    /// A run of unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// A run of bold text.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Parsed markup: styled runs plus the number of visual units (characters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    runs: Vec<Run>,
    units: usize,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[token("**")]
    Marker,

    #[token("<br>")]
    #[token("<br/>")]
    #[token("<br />")]
    Break,

    #[token("\n")]
    Newline,

    #[token("*")]
    #[token("<")]
    Symbol,

    #[regex(r"[^*<\n]+")]
    Text,
}

enum Piece<'a> {
    Marker,
    Break,
    Text(&'a str),
}

impl Markup {
    /// Parse a content string.
    ///
    /// `**x**` pairs with the nearest following marker on the same line; a
    /// marker without a partner is kept as literal text.
    pub fn parse(source: &str) -> Self {
        let mut pieces = Vec::new();
        let mut lexer = RawToken::lexer(source);
        while let Some(token) = lexer.next() {
            let piece = match token {
                Ok(RawToken::Marker) => Piece::Marker,
                Ok(RawToken::Break | RawToken::Newline) => Piece::Break,
                Ok(RawToken::Symbol | RawToken::Text) | Err(()) => Piece::Text(lexer.slice()),
            };
            pieces.push(piece);
        }

        let mut markup = Markup::default();
        let mut i = 0;
        while i < pieces.len() {
            match pieces[i] {
                Piece::Text(text) => markup.push(text, false),
                Piece::Break => markup.push("\n", false),
                Piece::Marker => {
                    if let Some(close) = closing_marker(&pieces, i + 1) {
                        for piece in &pieces[i + 1..close] {
                            if let Piece::Text(text) = piece {
                                markup.push(text, true);
                            }
                        }
                        i = close;
                    } else {
                        markup.push("**", false);
                    }
                }
            }
            i += 1;
        }
        markup
    }

    /// Build markup from already-styled runs.
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        let mut markup = Markup::default();
        for run in runs {
            markup.push(&run.text, run.bold);
        }
        markup
    }

    /// The styled runs, in order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of visual units (characters) in the text.
    pub fn len(&self) -> usize {
        self.units
    }

    /// Whether the text has no visible units.
    pub fn is_empty(&self) -> bool {
        self.units == 0
    }

    /// The first `units` characters, keeping run structure intact.
    pub fn prefix(&self, units: usize) -> Vec<Run> {
        let mut out = Vec::new();
        let mut remaining = units;
        for run in &self.runs {
            if remaining == 0 {
                break;
            }
            let count = run.text.chars().count();
            if count <= remaining {
                out.push(run.clone());
                remaining -= count;
            } else {
                let end = run
                    .text
                    .char_indices()
                    .nth(remaining)
                    .map(|(i, _)| i)
                    .unwrap_or(run.text.len());
                out.push(Run {
                    text: run.text[..end].to_string(),
                    bold: run.bold,
                });
                remaining = 0;
            }
        }
        out
    }

    /// The text with all markup removed.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, bold: bool) {
        if text.is_empty() {
            return;
        }
        self.units += text.chars().count();
        match self.runs.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                bold,
            }),
        }
    }
}

/// Find the marker closing a bold span opened just before `from`. Bold
/// never spans a line break.
fn closing_marker(pieces: &[Piece<'_>], from: usize) -> Option<usize> {
    for (offset, piece) in pieces[from..].iter().enumerate() {
        match piece {
            Piece::Marker => return Some(from + offset),
            Piece::Break => return None,
            Piece::Text(_) => {}
        }
    }
    None
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<&str> for Markup {
    fn from(source: &str) -> Self {
        Markup::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_text_is_one_run() {
        let m = Markup::parse("A dusty hall.");
        assert_eq!(m.runs(), &[Run::plain("A dusty hall.")]);
        assert_eq!(m.len(), 13);
    }

    #[test]
    fn bold_spans() {
        let m = Markup::parse("Go **north** or **south**.");
        assert_eq!(
            m.runs(),
            &[
                Run::plain("Go "),
                Run::bold("north"),
                Run::plain(" or "),
                Run::bold("south"),
                Run::plain("."),
            ]
        );
        assert_eq!(m.plain(), "Go north or south.");
    }

    #[test]
    fn unpaired_marker_is_literal() {
        let m = Markup::parse("2 ** 3");
        assert_eq!(m.runs(), &[Run::plain("2 ** 3")]);
    }

    #[test]
    fn bold_does_not_cross_lines() {
        let m = Markup::parse("**a\nb**");
        assert_eq!(m.plain(), "**a\nb**");
        assert!(m.runs().iter().all(|r| !r.bold));
    }

    #[test]
    fn br_becomes_newline() {
        let m = Markup::parse("one<br>two<br/>three");
        assert_eq!(m.plain(), "one\ntwo\nthree");
    }

    #[test]
    fn stray_symbols_survive() {
        let m = Markup::parse("a < b * c");
        assert_eq!(m.plain(), "a < b * c");
    }

    #[test]
    fn prefix_inside_bold_keeps_structure() {
        let m = Markup::parse("see **lamp** here");
        assert_eq!(m.prefix(6), vec![Run::plain("see "), Run::bold("la")]);
        assert_eq!(m.prefix(0), Vec::<Run>::new());
        assert_eq!(m.prefix(100), m.runs().to_vec());
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let m = Markup::parse("**über** café");
        assert_eq!(m.prefix(2), vec![Run::bold("üb")]);
        assert_eq!(m.len(), 9);
    }

    #[test]
    fn empty_bold_vanishes() {
        let m = Markup::parse("a****b");
        assert_eq!(m.runs(), &[Run::plain("ab")]);
    }

    proptest! {
        #[test]
        fn prefix_is_a_prefix_of_plain(s in "[a-z *<>\\n]{0,40}", k in 0usize..50) {
            let m = Markup::parse(&s);
            let prefix: String = m.prefix(k).iter().map(|r| r.text.as_str()).collect();
            let expected: String = m.plain().chars().take(k).collect();
            prop_assert_eq!(prefix, expected);
        }

        #[test]
        fn runs_are_normalised(s in "[a-z *\\n]{0,40}") {
            let m = Markup::parse(&s);
            prop_assert!(m.runs().iter().all(|r| !r.text.is_empty()));
            prop_assert!(m.runs().windows(2).all(|w| w[0].bold != w[1].bold));
            prop_assert_eq!(m.len(), m.plain().chars().count());
        }
    }
}
