//! Serialization boundary for the notification store.
//!
//! Only the notification list and the unread count cross this boundary;
//! dropdown visibility, toasts, and the undo ledger never do.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rollcall_core::error::AppError;
use rollcall_core::result::AppResult;
use rollcall_entity::notification::Notification;

/// Version written into the storage envelope.
pub const STATE_VERSION: u32 = 0;

/// The persisted part of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Notifications, most recent first.
    pub notifications: Vec<Notification>,
    /// Unread count at the time of writing.
    pub unread_count: usize,
}

/// On-disk envelope around [`PersistedState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEnvelope {
    /// The persisted state.
    pub state: PersistedState,
    /// Layout version.
    #[serde(default)]
    pub version: u32,
}

/// A named slot the store hydrates from and writes back to.
pub trait StatePersistence: Send + Sync + fmt::Debug {
    /// Read the slot. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> AppResult<Option<PersistedState>>;

    /// Overwrite the slot.
    fn save(&self, state: &PersistedState) -> AppResult<()>;
}

/// Persistence that keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersistence;

impl StatePersistence for NoopPersistence {
    fn load(&self) -> AppResult<Option<PersistedState>> {
        Ok(None)
    }

    fn save(&self, _state: &PersistedState) -> AppResult<()> {
        Ok(())
    }
}

/// Persistence into a serialized in-memory slot.
///
/// The slot holds the same JSON text a file would, so hydration goes
/// through the real decoding path.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<String>>,
}

impl MemoryPersistence {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON currently stored, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StatePersistence for MemoryPersistence {
    fn load(&self) -> AppResult<Option<PersistedState>> {
        match self.raw() {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> AppResult<()> {
        let raw = encode(state)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw);
        Ok(())
    }
}

/// Persistence into a JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist into `path`. Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the slot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatePersistence for JsonFilePersistence {
    fn load(&self) -> AppResult<Option<PersistedState>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::with_source(
                    rollcall_core::error::ErrorKind::Storage,
                    format!("Failed to read {}: {e}", self.path.display()),
                    e,
                ));
            }
        };
        decode(&raw).map(Some)
    }

    fn save(&self, state: &PersistedState) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = encode(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), count = state.notifications.len(), "Persisted notifications");
        Ok(())
    }
}

fn encode(state: &PersistedState) -> AppResult<String> {
    let envelope = StorageEnvelope {
        state: state.clone(),
        version: STATE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

fn decode(raw: &str) -> AppResult<PersistedState> {
    let envelope: StorageEnvelope = serde_json::from_str(raw)?;
    Ok(envelope.state)
}
