//! Save and load through a key-value store.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use verne_core::{SessionState, World};

use crate::error::{PersistError, PersistResult, StoreError};
use crate::interpreter::{describe_room, narration};
use crate::step::{Mutation, Step};

/// String-keyed storage for saved sessions.
pub trait KvStore {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// A store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    /// An empty, writable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a value, bypassing the read-only flag.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable("store is read-only".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// The persisted part of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    /// Room the player is in.
    pub current_room_id: String,
    /// Held items, sorted.
    pub inventory: Vec<String>,
    /// Transformed rooms, sorted.
    pub transformed_rooms: Vec<String>,
}

impl SaveBlob {
    /// Capture a session.
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            current_room_id: state.current_room.clone(),
            inventory: state.inventory.iter().cloned().collect(),
            transformed_rooms: state.transformed.iter().cloned().collect(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse JSON and check it against the world.
    pub fn parse(json: &str, world: &World) -> PersistResult<Self> {
        let blob: SaveBlob = serde_json::from_str(json)?;
        blob.validate(world)?;
        Ok(blob)
    }

    /// Check that the room exists and every list entry is a usable id.
    pub fn validate(&self, world: &World) -> PersistResult<()> {
        if !world.contains(&self.current_room_id) {
            return Err(PersistError::UnknownRoom(self.current_room_id.clone()));
        }
        if self.inventory.iter().any(|i| i.trim().is_empty()) {
            return Err(PersistError::Invalid("blank inventory item".into()));
        }
        if self.transformed_rooms.iter().any(|r| r.trim().is_empty()) {
            return Err(PersistError::Invalid("blank transformed room".into()));
        }
        Ok(())
    }

    /// The mutation that puts this blob into a session.
    pub fn restore(&self) -> Mutation {
        Mutation::Restore {
            current_room: self.current_room_id.clone(),
            inventory: self.inventory.iter().cloned().collect::<BTreeSet<_>>(),
            transformed: self.transformed_rooms.iter().cloned().collect::<BTreeSet<_>>(),
        }
    }
}

/// Write the session under `key`.
pub fn save(store: &mut dyn KvStore, state: &SessionState, key: &str) -> PersistResult<()> {
    let json = SaveBlob::from_state(state).to_json()?;
    store.set(key, &json)?;
    Ok(())
}

/// Read the session stored under `key`, if any.
pub fn load(store: &dyn KvStore, world: &World, key: &str) -> PersistResult<Option<SaveBlob>> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    SaveBlob::parse(&json, world).map(Some)
}

/// Save and report the outcome.
pub fn save_steps(store: &mut dyn KvStore, state: &SessionState, key: &str) -> Vec<Step> {
    match save(store, state, key) {
        Ok(()) => vec![Step::Print(narration::SAVED.to_string())],
        Err(e) => {
            warn!(error = %e, key, "saving failed");
            vec![Step::Print(narration::SAVE_FAILED.to_string())]
        }
    }
}

/// Load, and on success restore the session and show the room again.
///
/// A failed load leaves the session untouched.
pub fn load_steps(
    store: &dyn KvStore,
    world: &World,
    state: &SessionState,
    key: &str,
) -> Vec<Step> {
    let blob = match load(store, world, key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return vec![Step::Print(narration::NO_SAVE.to_string())],
        Err(e) => {
            warn!(error = %e, key, "loading failed");
            return vec![Step::Print(narration::load_failed(&e.to_string()))];
        }
    };

    let restore = blob.restore();
    let mut restored = state.clone();
    restore.apply(&mut restored);

    let mut steps = vec![Step::Apply(restore), Step::Clear];
    steps.extend(describe_room(world, &restored));
    steps.push(Step::Print(narration::LOADED.to_string()));
    steps.push(Step::Print(narration::PROMPT.to_string()));
    steps
}
