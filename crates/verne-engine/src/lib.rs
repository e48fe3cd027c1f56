//! Interaction engine for Verne.
//!
//! The [`interpreter`] turns a line of input into an ordered list of
//! [`Step`]s without touching any state. The [`Engine`] owns the session,
//! runs those steps in order, and hands animated text to the
//! [`Renderer`], resuming only when a reveal has finished. Save and load go
//! through the [`KvStore`] seam in [`persist`].

/// Engine configuration.
pub mod config;
/// The step sequencer that owns a running session.
pub mod engine;
/// Error types for persistence.
pub mod error;
/// Input planning: commands, riddles, exits, and tab completion.
pub mod interpreter;
/// Save/load through a key-value store.
pub mod persist;
/// Typewriter rendering onto an output surface.
pub mod render;
/// Planned units of work.
pub mod step;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{PersistError, StoreError};
pub use interpreter::{available_actions, complete, plan};
pub use persist::{FileStore, KvStore, MemoryStore, SaveBlob};
pub use render::{Backdrop, BlockId, Renderer, RevealId, Surface, Transcript};
pub use step::{Mutation, PersistOp, Step};
