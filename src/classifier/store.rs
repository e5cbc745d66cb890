//! Snapshot stores: where encoded models live between sessions.
//!
//! A store maps a key to one opaque blob. The classifier never touches the
//! storage medium itself; it hands framed snapshots to a [`SnapshotStore`]
//! and gets them back. Trained state is a cache, so
//! [`load_model_or_empty`] turns a missing or unusable snapshot into a fresh
//! model instead of an error.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::classifier::model::Model;
use crate::classifier::snapshot::SnapshotFormat;
use crate::error::{Result, SieveError};

/// A key → blob store for encoded snapshots.
pub trait SnapshotStore: Send + Sync + std::fmt::Debug {
    /// Read the blob stored under `key`, or `None` if there is none.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous blob.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Remove the blob stored under `key`. Removing a missing key is not an
    /// error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Get the name of this store for debugging and logging.
    fn name(&self) -> &str;
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SieveError::invalid_argument("snapshot key must not be empty"));
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(SieveError::invalid_argument(format!(
            "snapshot key {key:?} must be a plain name"
        )));
    }
    Ok(())
}

/// In-memory store, mostly for tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn blobs(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.blobs
            .lock()
            .map_err(|_| SieveError::storage("memory snapshot store lock poisoned"))
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        Ok(self.blobs()?.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        check_key(key)?;
        self.blobs()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.blobs()?.remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// File-backed store: one file per key inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    directory: PathBuf,
}

impl FileSnapshotStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                SieveError::storage(format!(
                    "failed to create snapshot directory {}: {e}",
                    directory.display()
                ))
            })?;
        }
        if !directory.is_dir() {
            return Err(SieveError::storage(format!(
                "snapshot path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(Self { directory })
    }

    /// Open the store holding `path`, keyed by its file name.
    ///
    /// Convenience for callers that think in snapshot files rather than
    /// keys.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Result<(Self, String)> {
        let path = path.as_ref();
        let key = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SieveError::invalid_argument(format!(
                    "snapshot path {} has no usable file name",
                    path.display()
                ))
            })?
            .to_string();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok((Self::new(directory)?, key))
    }

    /// Directory holding the snapshot files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.directory.join(key))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let mut temp_file = NamedTempFile::new_in(&self.directory)?;
        temp_file.write_all(bytes)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path).map_err(|e| {
            SieveError::storage(format!(
                "failed to move snapshot into place at {}: {}",
                path.display(),
                e.error
            ))
        })?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Encode `model` and store it under `key`.
pub fn save_model(
    store: &dyn SnapshotStore,
    key: &str,
    model: &Model,
    format: SnapshotFormat,
) -> Result<()> {
    let bytes = model.encode(format)?;
    store.save(key, &bytes)?;
    info!(
        "saved {format} snapshot {key:?} to {} store ({} bytes, {} documents)",
        store.name(),
        bytes.len(),
        model.total_documents()
    );
    Ok(())
}

/// Load and validate the model stored under `key`.
///
/// `Ok(None)` means nothing is stored there; a stored but unusable
/// snapshot is an error.
pub fn load_model(store: &dyn SnapshotStore, key: &str) -> Result<Option<Model>> {
    let Some(bytes) = store.load(key)? else {
        return Ok(None);
    };
    let model = Model::decode(&bytes)?;
    info!(
        "loaded snapshot {key:?} from {} store ({} labels, {} documents)",
        store.name(),
        model.label_count(),
        model.total_documents()
    );
    Ok(Some(model))
}

/// Load the model stored under `key`, starting over with an empty model if
/// it is missing or unusable.
///
/// Only snapshot failures (see [`SieveError::is_recoverable_snapshot_error`])
/// are absorbed; an invalid key is still returned as an error.
pub fn load_model_or_empty(store: &dyn SnapshotStore, key: &str) -> Result<Model> {
    match load_model(store, key) {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            info!("no snapshot stored under {key:?}; starting with an empty model");
            Ok(Model::new())
        }
        Err(e) if e.is_recoverable_snapshot_error() => {
            warn!("discarding snapshot {key:?}: {e}; starting with an empty model");
            Ok(Model::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_model() -> Model {
        let mut model = Model::new();
        model.add_tokens("theist", ["god", "is", "real"]).unwrap();
        model.add_tokens("neutral", ["nature", "is", "beautiful"]).unwrap();
        model
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert!(store.load("model").unwrap().is_none());

        store.save("model", b"abc").unwrap();
        assert_eq!(store.load("model").unwrap().as_deref(), Some(&b"abc"[..]));
        assert_eq!(store.len(), 1);

        store.delete("model").unwrap();
        store.delete("model").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_keys() {
        let store = MemorySnapshotStore::new();
        for key in ["", "a/b", "..", "a\\b"] {
            assert!(
                matches!(store.save(key, b"x"), Err(SieveError::InvalidArgument(_))),
                "accepted key {key:?}"
            );
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshots")).unwrap();

        assert!(store.load("model.snap").unwrap().is_none());
        store.save("model.snap", b"first").unwrap();
        store.save("model.snap", b"second").unwrap();
        assert_eq!(
            store.load("model.snap").unwrap().as_deref(),
            Some(&b"second"[..])
        );

        store.delete("model.snap").unwrap();
        assert!(store.load("model.snap").unwrap().is_none());
        assert!(store.delete("model.snap").is_ok());
    }

    #[test]
    fn test_file_store_for_file() {
        let dir = tempfile::tempdir().unwrap();
        let (store, key) = FileSnapshotStore::for_file(dir.path().join("m.snap")).unwrap();
        assert_eq!(key, "m.snap");
        assert_eq!(store.directory(), dir.path());
    }

    #[test]
    fn test_save_and_load_model() {
        let store = MemorySnapshotStore::new();
        let model = trained_model();

        save_model(&store, "model", &model, SnapshotFormat::Binary).unwrap();
        let restored = load_model(&store, "model").unwrap().unwrap();
        assert_eq!(restored, model);
        assert!(load_model(&store, "other").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_empty() {
        let store = MemorySnapshotStore::new();
        store.save("model", b"garbage").unwrap();

        assert!(matches!(
            load_model(&store, "model"),
            Err(SieveError::Decode(_))
        ));
        let model = load_model_or_empty(&store, "model").unwrap();
        assert!(!model.is_trained());

        let missing = load_model_or_empty(&store, "missing").unwrap();
        assert_eq!(missing.total_documents(), 0);
    }

    #[test]
    fn test_invalid_key_is_not_masked_by_fallback() {
        let store = MemorySnapshotStore::new();
        assert!(matches!(
            load_model_or_empty(&store, "a/b"),
            Err(SieveError::InvalidArgument(_))
        ));
        assert!(load_model_or_empty(&store, "").is_err());
    }
}
