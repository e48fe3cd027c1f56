use std::path::PathBuf;

/// Alias for `Result<T, ContentError>`.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised while loading world content. All of them are fatal: a
/// world that fails to load never starts a session.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The world file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid JSON or does not match the room schema.
    #[error("invalid game data: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level field is absent.
    #[error("invalid game data: missing '{0}'")]
    MissingField(&'static str),

    /// `start_room` does not name any room.
    #[error("invalid game data: start room \"{0}\" not found in rooms list")]
    UnknownStartRoom(String),
}

impl ContentError {
    /// One-based line and column of a JSON error, if this is one.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ContentError::Json(e) if e.line() > 0 => Some((e.line(), e.column())),
            _ => None,
        }
    }
}
