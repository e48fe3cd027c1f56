use std::collections::BTreeSet;

use crate::world::{Exit, ItemKind, Riddle, Room, World};

/// Identifies an exit by its room and position in that room's exit list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExitRef {
    /// Room holding the exit.
    pub room: String,
    /// Index into [`Room::exits`].
    pub index: usize,
}

/// Identifies a riddle item by its room and position in the item list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiddleRef {
    /// Room holding the riddle.
    pub room: String,
    /// Index into [`Room::items`].
    pub index: usize,
}

impl RiddleRef {
    /// Resolve to the riddle's name and data.
    pub fn resolve<'w>(&self, world: &'w World) -> Option<(&'w str, &'w Riddle)> {
        let item = world.room(&self.room)?.items.get(self.index)?;
        match &item.kind {
            ItemKind::Riddle(riddle) => Some((item.name.as_str(), riddle)),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The player typed `quit` or `exit`.
    Quit,
    /// The player walked into the end room.
    Escaped,
}

/// Gates how the next line of input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Regular commands.
    #[default]
    Normal,
    /// The next line answers this riddle.
    AwaitingRiddleAnswer(RiddleRef),
    /// The next submission shows the room just moved into.
    AwaitingEnter,
    /// Input is permanently disabled.
    Ended(Ending),
}

/// Everything that changes during a playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Id of the room the player is in.
    pub current_room: String,
    /// Held item ids. Sorted iteration order doubles as display order.
    pub inventory: BTreeSet<String>,
    /// Rooms that have transformed.
    pub transformed: BTreeSet<String>,
    /// Exits opened this session. Not persisted.
    pub unlocked_exits: BTreeSet<ExitRef>,
    /// Current wait-mode.
    pub mode: Mode,
}

impl SessionState {
    /// A fresh session in the given room.
    pub fn new(start_room: impl Into<String>) -> Self {
        Self {
            current_room: start_room.into(),
            inventory: BTreeSet::new(),
            transformed: BTreeSet::new(),
            unlocked_exits: BTreeSet::new(),
            mode: Mode::Normal,
        }
    }

    /// A fresh session in the world's start room.
    pub fn start(world: &World) -> Self {
        Self::new(world.start_room())
    }

    /// The current room, if it resolves.
    pub fn room<'w>(&self, world: &'w World) -> Option<&'w Room> {
        world.room(&self.current_room)
    }

    /// Whether the player holds an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }

    /// Add an item. Returns `false` if it was already held.
    pub fn grant(&mut self, item: impl Into<String>) -> bool {
        self.inventory.insert(item.into())
    }

    /// Whether a room has transformed.
    pub fn is_transformed(&self, room: &str) -> bool {
        self.transformed.contains(room)
    }

    /// Mark a room transformed. Returns `false` if it already was.
    pub fn mark_transformed(&mut self, room: impl Into<String>) -> bool {
        self.transformed.insert(room.into())
    }

    /// Whether an exit is locked right now, given its content definition.
    pub fn is_locked(&self, exit: &Exit, at: &ExitRef) -> bool {
        exit.locked && !self.unlocked_exits.contains(at)
    }

    /// Open an exit for the rest of the session. Returns `false` if it was
    /// already open.
    pub fn unlock(&mut self, at: ExitRef) -> bool {
        self.unlocked_exits.insert(at)
    }

    /// Whether input is disabled for good.
    pub fn is_ended(&self) -> bool {
        matches!(self.mode, Mode::Ended(_))
    }

    /// Comma-joined inventory in sorted order, or `None` when empty.
    pub fn inventory_listing(&self) -> Option<String> {
        if self.inventory.is_empty() {
            return None;
        }
        Some(
            self.inventory
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
