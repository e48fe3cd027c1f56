//! Core types for Verne: rooms, exits, items, the session state, and the
//! small text markup used by room descriptions.
//!
//! This crate is independent of any presentation. A [`World`] is loaded once
//! from JSON content and is read-only afterwards; everything that changes
//! while playing lives in [`SessionState`].

/// Error types used throughout the crate.
pub mod error;
/// Markup parsing into styled text runs.
pub mod markup;
/// Mutable per-playthrough state.
pub mod session;
/// The world model: rooms, exits, and items.
pub mod world;

/// Re-export error types.
pub use error::{ContentError, ContentResult};
/// Re-export markup types.
pub use markup::{Markup, Run};
/// Re-export session types.
pub use session::{Ending, ExitRef, Mode, RiddleRef, SessionState};
/// Re-export world model types.
pub use world::{ContentWarning, Exit, Item, ItemKind, Riddle, Room, World};
