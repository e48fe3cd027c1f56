use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use verne_core::{ContentError, ContentWarning};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A message about a world file, located by character offsets.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Range<usize>,
    pub message: String,
    pub label: Option<String>,
}

impl Diagnostic {
    /// Locate a load failure in the source.
    pub fn from_error(source: &str, err: &ContentError) -> Self {
        let span = match err {
            ContentError::Json(_) => err
                .location()
                .map(|(line, column)| point(source, line, column))
                .unwrap_or(0..0),
            ContentError::UnknownStartRoom(room) => find_quoted(source, room)
                .or_else(|| find_quoted(source, "start_room"))
                .unwrap_or(0..0),
            ContentError::MissingField(_) | ContentError::Io { .. } => 0..0,
        };
        Self {
            severity: Severity::Error,
            span,
            message: err.to_string(),
            label: None,
        }
    }

    /// Locate a lint warning at the first mention of its anchor.
    pub fn from_warning(source: &str, warning: &ContentWarning) -> Self {
        Self {
            severity: Severity::Warning,
            span: find_quoted(source, warning.anchor()).unwrap_or(0..0),
            message: warning.to_string(),
            label: Some(label_for(warning).to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

fn label_for(warning: &ContentWarning) -> &'static str {
    match warning {
        ContentWarning::DuplicateRoom { .. } => "later definition replaces the earlier one",
        ContentWarning::DanglingExit { .. } => "no room with this id",
        ContentWarning::LockedWithoutKey { .. } => "this exit can never be opened",
        ContentWarning::KeyNeverGranted { .. } => "no item gives this",
        ContentWarning::Unreachable { .. } => "no exit leads here",
    }
}

/// Character span of the first `"needle"` in the source.
fn find_quoted(source: &str, needle: &str) -> Option<Range<usize>> {
    let quoted = format!("\"{needle}\"");
    let byte = source.find(&quoted)?;
    let start = source[..byte].chars().count();
    Some(start..start + quoted.chars().count())
}

/// One-character span at a one-based line and column.
fn point(source: &str, line: usize, column: usize) -> Range<usize> {
    let total = source.chars().count();
    let mut offset = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line {
            let start = (offset + column.saturating_sub(1)).min(total);
            return start..(start + 1).min(total);
        }
        offset += text.chars().count() + 1;
    }
    total..total
}

/// Render diagnostics using ariadne for terminal output.
pub fn render(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let (kind, color) = match diag.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        Report::build(kind, (filename, diag.span.clone()))
            .with_message(&diag.message)
            .with_label(
                Label::new((filename, diag.span.clone()))
                    .with_message(label_text)
                    .with_color(color),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verne_core::World;

    #[test]
    fn json_errors_point_at_the_problem() {
        let source = "{\n  \"start_room\": ]\n}";
        let err = World::from_json(source).unwrap_err();
        let diag = Diagnostic::from_error(source, &err);
        assert_eq!(diag.severity, Severity::Error);
        assert!((2..20).contains(&diag.span.start), "{:?}", diag.span);
    }

    #[test]
    fn unknown_start_room_points_at_its_name() {
        let source = r#"{"start_room": "nowhere", "rooms": []}"#;
        let err = World::from_json(source).unwrap_err();
        let diag = Diagnostic::from_error(source, &err);
        assert_eq!(diag.span, 15..24);
    }

    #[test]
    fn warnings_point_at_anchor() {
        let source = r#"{"rooms": [{"id": "a", "exits": [{"name": "x", "to": "ghost"}]}]}"#;
        let warning = ContentWarning::DanglingExit {
            room: "a".into(),
            exit: "x".into(),
            to: "ghost".into(),
        };
        let diag = Diagnostic::from_warning(source, &warning);
        assert_eq!(&source[diag.span.clone()], "\"ghost\"");
        assert_eq!(diag.to_string(), format!("warning: {warning}"));
    }

    #[test]
    fn render_produces_output() {
        let source = r#"{"start_room": "nowhere", "rooms": []}"#;
        let err = World::from_json(source).unwrap_err();
        let output = render(source, "world.json", &[Diagnostic::from_error(source, &err)]);
        assert!(output.contains("start room"));
    }
}
