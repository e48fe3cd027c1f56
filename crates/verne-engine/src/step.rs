use std::collections::BTreeSet;

use verne_core::{ExitRef, Mode, SessionState};

/// One unit of a planned turn.
///
/// Steps run strictly in order. A [`Step::Reveal`] suspends the queue until
/// the renderer reports the text fully shown, so any [`Step::Apply`] after
/// it takes effect only once the player has seen what precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show markup at once in a new block.
    Print(String),
    /// Show markup character by character in a new block.
    Reveal(String),
    /// Wipe the output surface.
    Clear,
    /// Change the session.
    Apply(Mutation),
    /// Tell the surface which room (and which variant of it) is on screen.
    RoomChanged {
        /// Room id.
        room: String,
        /// Whether the room has transformed.
        transformed: bool,
    },
    /// Hand over to the persistence adapter.
    Persist(PersistOp),
}

/// A change to [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Set the current room.
    MoveTo(String),
    /// Add an item to the inventory.
    Grant(String),
    /// Add a room to the transformed set.
    MarkTransformed(String),
    /// Open an exit for the rest of the session.
    Unlock(ExitRef),
    /// Switch wait-mode.
    SetMode(Mode),
    /// Replace the session with a saved one. Unlocked exits are kept and the
    /// mode returns to normal.
    Restore {
        /// Saved room id.
        current_room: String,
        /// Saved inventory.
        inventory: BTreeSet<String>,
        /// Saved transformed rooms.
        transformed: BTreeSet<String>,
    },
}

impl Mutation {
    /// Apply the change.
    pub fn apply(&self, state: &mut SessionState) {
        match self {
            Mutation::MoveTo(room) => state.current_room = room.clone(),
            Mutation::Grant(item) => {
                state.grant(item.clone());
            }
            Mutation::MarkTransformed(room) => {
                state.mark_transformed(room.clone());
            }
            Mutation::Unlock(at) => {
                state.unlock(at.clone());
            }
            Mutation::SetMode(mode) => state.mode = mode.clone(),
            Mutation::Restore {
                current_room,
                inventory,
                transformed,
            } => {
                state.current_room = current_room.clone();
                state.inventory = inventory.clone();
                state.transformed = transformed.clone();
                state.mode = Mode::Normal;
            }
        }
    }
}

/// A request to the persistence adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    /// Write the session to the store.
    Save,
    /// Read the session back from the store.
    Load,
}
