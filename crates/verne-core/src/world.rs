use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

/// Room id used as the win condition when the content names none.
pub const DEFAULT_END_ROOM: &str = "END";

/// A way out of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// Action word that takes this exit.
    pub name: String,
    /// Destination room id.
    pub to: String,
    /// Whether the exit starts out locked.
    #[serde(default)]
    pub locked: bool,
    /// Item id that opens the exit when locked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// A riddle posed by an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riddle {
    /// The question shown to the player.
    pub prompt: String,
    /// Expected answer, compared case-insensitively.
    pub answer: String,
    /// Text shown on a correct answer.
    pub success_text: String,
    /// Item granted on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gives_item: Option<String>,
}

impl Riddle {
    /// Whether `attempt` answers the riddle, ignoring case and surrounding
    /// whitespace.
    pub fn is_answer(&self, attempt: &str) -> bool {
        attempt.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }

    /// The inventory token granted on success. Falls back to
    /// `<name>_solved` when the content names no item.
    pub fn reward(&self, item_name: &str) -> String {
        match self.gives_item.as_deref() {
            Some(item) if !item.is_empty() => item.to_string(),
            _ => format!("{item_name}_solved"),
        }
    }
}

/// What an item does when the player names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    /// Shows a static text.
    Hint {
        /// The hint text.
        text: String,
    },
    /// Shows a description and may hand the player an item.
    Inventory {
        /// Description shown when examined.
        description: String,
        /// Item id granted on examination.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gives_item: Option<String>,
    },
    /// Asks a question and waits for the answer.
    Riddle(Riddle),
    /// Any type the engine does not know.
    #[serde(other)]
    Unknown,
}

/// Something in a room the player can interact with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Action word that selects this item.
    pub name: String,
    /// Type-specific behaviour.
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    /// The inventory token this item grants, if any.
    pub fn grants(&self) -> Option<String> {
        match &self.kind {
            ItemKind::Inventory { gives_item, .. } => gives_item.clone(),
            ItemKind::Riddle(riddle) => Some(riddle.reward(&self.name)),
            ItemKind::Hint { .. } | ItemKind::Unknown => None,
        }
    }
}

/// A room in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room id; also used as the displayed room name.
    pub id: String,
    /// Text shown on entry.
    pub entry_text: String,
    /// Text shown on entry once the room is transformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_text_after: Option<String>,
    /// Text shown at the moment the room transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_text: Option<String>,
    /// Exits, in content order.
    #[serde(default)]
    pub exits: Vec<Exit>,
    /// Items, in content order.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Room {
    /// Create a room with only an entry text.
    pub fn new(id: impl Into<String>, entry_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entry_text: entry_text.into(),
            entry_text_after: None,
            transform_text: None,
            exits: Vec::new(),
            items: Vec::new(),
        }
    }

    /// The alternate entry text, if present and non-empty.
    pub fn after_text(&self) -> Option<&str> {
        self.entry_text_after.as_deref().filter(|t| !t.is_empty())
    }

    /// The transformation text, if present and non-empty.
    pub fn transform(&self) -> Option<&str> {
        self.transform_text.as_deref().filter(|t| !t.is_empty())
    }

    /// The entry text to show given the room's transformed flag.
    pub fn entry_for(&self, transformed: bool) -> &str {
        match self.after_text() {
            Some(after) if transformed => after,
            _ => &self.entry_text,
        }
    }

    /// Find an item by action word (case-insensitive). First match wins.
    pub fn find_item(&self, word: &str) -> Option<(usize, &Item)> {
        let word = word.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.name.to_lowercase() == word)
    }

    /// Find an exit by action word (case-insensitive). First match wins.
    pub fn find_exit(&self, word: &str) -> Option<(usize, &Exit)> {
        let word = word.to_lowercase();
        self.exits
            .iter()
            .enumerate()
            .find(|(_, exit)| exit.name.to_lowercase() == word)
    }

    /// Lower-cased action words offered by this room, sorted and deduplicated.
    pub fn action_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .exits
            .iter()
            .map(|e| e.name.to_lowercase())
            .chain(self.items.iter().map(|i| i.name.to_lowercase()))
            .collect();
        words.sort();
        words.dedup();
        words
    }
}

/// A non-fatal problem found in world content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentWarning {
    /// Two rooms share an id; the later one wins.
    DuplicateRoom {
        /// The repeated id.
        id: String,
    },
    /// An exit leads to a room that does not exist.
    DanglingExit {
        /// Room holding the exit.
        room: String,
        /// Exit name.
        exit: String,
        /// Missing destination.
        to: String,
    },
    /// A locked exit names no key, so it can never open.
    LockedWithoutKey {
        /// Room holding the exit.
        room: String,
        /// Exit name.
        exit: String,
    },
    /// A locked exit's key is not granted by any item.
    KeyNeverGranted {
        /// Room holding the exit.
        room: String,
        /// Exit name.
        exit: String,
        /// The unobtainable key.
        key: String,
    },
    /// A room cannot be reached from the start room.
    Unreachable {
        /// The isolated room.
        room: String,
    },
}

impl ContentWarning {
    /// The string in the content that best locates the problem.
    pub fn anchor(&self) -> &str {
        match self {
            ContentWarning::DuplicateRoom { id } => id,
            ContentWarning::DanglingExit { to, .. } => to,
            ContentWarning::LockedWithoutKey { exit, .. } => exit,
            ContentWarning::KeyNeverGranted { key, .. } => key,
            ContentWarning::Unreachable { room } => room,
        }
    }
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentWarning::DuplicateRoom { id } => {
                write!(f, "room \"{id}\" is defined more than once")
            }
            ContentWarning::DanglingExit { room, exit, to } => {
                write!(f, "exit \"{exit}\" in \"{room}\" leads to unknown room \"{to}\"")
            }
            ContentWarning::LockedWithoutKey { room, exit } => {
                write!(f, "locked exit \"{exit}\" in \"{room}\" has no key")
            }
            ContentWarning::KeyNeverGranted { room, exit, key } => write!(
                f,
                "key \"{key}\" for exit \"{exit}\" in \"{room}\" is never granted"
            ),
            ContentWarning::Unreachable { room } => {
                write!(f, "room \"{room}\" is unreachable from the start room")
            }
        }
    }
}

#[derive(Deserialize)]
struct RawWorld {
    start_room: Option<String>,
    end_room: Option<String>,
    rooms: Option<Vec<Room>>,
}

/// The world model. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct World {
    start_room: String,
    end_room: String,
    rooms: Vec<Room>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl World {
    /// Build a world from rooms, validating the start room.
    pub fn new(
        start_room: impl Into<String>,
        end_room: impl Into<String>,
        rooms: Vec<Room>,
    ) -> ContentResult<Self> {
        let start_room = start_room.into();
        let mut index = HashMap::new();
        let mut duplicates = Vec::new();
        for (i, room) in rooms.iter().enumerate() {
            if index.insert(room.id.clone(), i).is_some() {
                duplicates.push(room.id.clone());
            }
        }
        if !index.contains_key(&start_room) {
            return Err(ContentError::UnknownStartRoom(start_room));
        }
        Ok(Self {
            start_room,
            end_room: end_room.into(),
            rooms,
            index,
            duplicates,
        })
    }

    /// Parse world content from a JSON string.
    pub fn from_json(source: &str) -> ContentResult<Self> {
        let raw: RawWorld = serde_json::from_str(source)?;
        let start_room = raw
            .start_room
            .ok_or(ContentError::MissingField("start_room"))?;
        let rooms = raw.rooms.ok_or(ContentError::MissingField("rooms"))?;
        let end_room = raw.end_room.unwrap_or_else(|| DEFAULT_END_ROOM.to_string());
        Self::new(start_room, end_room, rooms)
    }

    /// Read and parse a world file.
    pub fn load(path: &Path) -> ContentResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// The room a new session starts in.
    pub fn start_room(&self) -> &str {
        &self.start_room
    }

    /// Reaching this room id wins the game.
    pub fn end_room(&self) -> &str {
        &self.end_room
    }

    /// All rooms in content order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Look up a room by id. When ids repeat, the last definition wins.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.index.get(id).map(|&i| &self.rooms[i])
    }

    /// Whether a room id resolves.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of distinct room ids.
    pub fn room_count(&self) -> usize {
        self.index.len()
    }

    /// Room ids reachable from the start room through any exit, in
    /// breadth-first order. Locks are ignored.
    pub fn reachable_from_start(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.start_room.as_str()]);
        while let Some(id) = queue.pop_front() {
            let Some(room) = self.room(id) else {
                continue;
            };
            if !seen.insert(room.id.as_str()) {
                continue;
            }
            order.push(room.id.as_str());
            for exit in &room.exits {
                queue.push_back(exit.to.as_str());
            }
        }
        order
    }

    /// Check the content for problems that do not prevent loading.
    pub fn lint(&self) -> Vec<ContentWarning> {
        let mut warnings: Vec<ContentWarning> = self
            .duplicates
            .iter()
            .map(|id| ContentWarning::DuplicateRoom { id: id.clone() })
            .collect();

        let granted: HashSet<String> = self
            .rooms
            .iter()
            .flat_map(|r| r.items.iter().filter_map(Item::grants))
            .collect();

        for room in &self.rooms {
            for exit in &room.exits {
                if exit.to != self.end_room && !self.contains(&exit.to) {
                    warnings.push(ContentWarning::DanglingExit {
                        room: room.id.clone(),
                        exit: exit.name.clone(),
                        to: exit.to.clone(),
                    });
                }
                if !exit.locked {
                    continue;
                }
                match exit.key.as_deref() {
                    None | Some("") => warnings.push(ContentWarning::LockedWithoutKey {
                        room: room.id.clone(),
                        exit: exit.name.clone(),
                    }),
                    Some(key) if !granted.contains(key) => {
                        warnings.push(ContentWarning::KeyNeverGranted {
                            room: room.id.clone(),
                            exit: exit.name.clone(),
                            key: key.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        let reachable: HashSet<&str> = self.reachable_from_start().into_iter().collect();
        let mut reported = HashSet::new();
        for room in &self.rooms {
            if !reachable.contains(room.id.as_str()) && reported.insert(room.id.as_str()) {
                warnings.push(ContentWarning::Unreachable {
                    room: room.id.clone(),
                });
            }
        }

        warnings
    }
}
