//! Local persisted state - the claimed username survives restarts.
//!
//! Persistence is best-effort by contract: a store that cannot read or
//! write leaves the session usable (the user just re-claims their name),
//! so the trait exposes no error channel and implementations log failures
//! instead of propagating them.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use log::warn;
use serde::{Deserialize, Serialize};

/// Client-local key-value state, namespaced per app.
///
/// Only one key exists today: the claimed username.
pub trait LocalStateStore: Send + Sync {
    /// The persisted username, if one was claimed.
    fn username(&self) -> Option<String>;

    /// Persist or clear the username.
    fn set_username(&self, username: Option<&str>);
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStateStore {
    username: RwLock<Option<String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStateStore for MemoryStateStore {
    fn username(&self) -> Option<String> {
        self.username
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_username(&self, username: Option<&str>) {
        *self
            .username
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = username.map(str::to_string);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    username: Option<String>,
}

/// JSON-file-backed store, used by the desktop adapters.
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> PersistedState {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(
                    "Local state file {} is unreadable ({}), starting fresh",
                    self.path.display(),
                    e
                );
                PersistedState::default()
            }),
            Err(_) => PersistedState::default(),
        }
    }

    fn save(&self, state: &PersistedState) {
        let serialized = match serde_json::to_string_pretty(state) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize local state: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            warn!(
                "Failed to write local state to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl LocalStateStore for JsonFileStateStore {
    fn username(&self) -> Option<String> {
        self.load().username
    }

    fn set_username(&self, username: Option<&str>) {
        let mut state = self.load();
        state.username = username.map(str::to_string);
        self.save(&state);
    }
}
