//! Key/value persistence for the workout store's collections.
//!
//! Backends only move strings in and out of named slots. The typed
//! [`Persistence`] layer on top encodes each collection as a versioned JSON
//! envelope and turns every failure into a logged warning: a missing or
//! corrupt record loads as the empty collection, and a failed write leaves
//! the caller's in-memory state untouched.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Current envelope version written by [`Persistence::save_collection`]
pub const FORMAT_VERSION: u32 = 1;

/// The four independently persisted collections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Workouts,
    CompletedWorkouts,
    PreviousSets,
    ProgressionSuggestions,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 4] = [
        CollectionKey::Workouts,
        CollectionKey::CompletedWorkouts,
        CollectionKey::PreviousSets,
        CollectionKey::ProgressionSuggestions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Workouts => "workouts",
            CollectionKey::CompletedWorkouts => "completedWorkouts",
            CollectionKey::PreviousSets => "previousSets",
            CollectionKey::ProgressionSuggestions => "progressionSuggestions",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable string storage addressed by key
pub trait KeyValueStore {
    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Returns `Ok(None)` when nothing has been stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;
}

// ============================================================================
// File backend
// ============================================================================

/// One JSON file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    /// Atomically writes the value by writing a temp file in the same
    /// directory, syncing it, then renaming it over the original.
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Serialize concurrent writers on the temp file
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} to {:?}", key, path);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        tracing::debug!("Loaded {} from {:?}", key, path);
        Ok(Some(contents))
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local backend, mainly for tests
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing encoding (e.g. to plant corrupt data)
    pub fn seed(&mut self, key: &str, raw: impl Into<String>) {
        self.entries.insert(key.to_string(), raw.into());
    }

    /// Make every subsequent `save` fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Storage(format!("write to {} rejected", key)));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}

// ============================================================================
// Typed layer
// ============================================================================

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

/// Encodes collections into a [`KeyValueStore`] and never fails the caller
pub struct Persistence<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Encode and store a collection. Returns whether the write succeeded.
    pub fn save_collection<T: Serialize>(&mut self, key: CollectionKey, data: &T) -> bool {
        let encoded = match serde_json::to_string(&EnvelopeRef {
            version: FORMAT_VERSION,
            data,
        }) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Failed to encode {}: {}", key, e);
                return false;
            }
        };

        match self.backend.save(key.as_str(), &encoded) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save {}: {}. Keeping in-memory state.", key, e);
                false
            }
        }
    }

    /// Load a collection, substituting the empty value on any failure
    pub fn load_collection<T: DeserializeOwned + Default>(&self, key: CollectionKey) -> T {
        let raw = match self.backend.load(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored data for {}, starting empty", key);
                return T::default();
            }
            Err(e) => {
                tracing::warn!("Unable to read {}: {}. Starting empty.", key, e);
                return T::default();
            }
        };

        match decode(key, &raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}. Starting empty.", key, e);
                T::default()
            }
        }
    }
}

/// Decode either a versioned envelope or a bare, pre-envelope record
fn decode<T: DeserializeOwned>(key: CollectionKey, raw: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(raw)?;

    let is_envelope = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("version") && obj.contains_key("data"));

    if !is_envelope {
        return Ok(serde_json::from_value(value)?);
    }

    let envelope: Envelope = serde_json::from_value(value)?;
    if envelope.version > FORMAT_VERSION {
        tracing::warn!(
            "{} was written by format version {} (this build understands {}), decoding best-effort",
            key,
            envelope.version,
            FORMAT_VERSION
        );
    }
    Ok(serde_json::from_value(envelope.data)?)
}
