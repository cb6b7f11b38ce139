use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

use crate::models::{RepositoryError, RepositoryResult};

/// String key/value medium the store persists into.
///
/// Mirrors the browser `localStorage` contract: values are opaque strings,
/// a missing key reads as `None`, and removing a missing key succeeds.
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve a value by key
    fn get_item(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Insert or replace a value
    fn set_item(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// Remove a value by key
    fn remove_item(&self, key: &str) -> RepositoryResult<()>;
}

/// In-process storage backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry, like a browser data wipe
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> RepositoryResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::Unavailable)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepositoryResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::Unavailable)?;
        entries.remove(key);
        Ok(())
    }
}

/// Durable storage keeping one `<key>.json` file per entry in a directory
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>) -> RepositoryResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("File storage opened");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the storage directory (for testing)
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> RepositoryResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(RepositoryError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> RepositoryResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable)?;

        fs::write(&tmp_path, value)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(key = %key, bytes = value.len(), "Entry written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepositoryResult<()> {
        let path = self.path_for(key)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Storage for execution contexts without a persistent medium; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> RepositoryResult<Option<String>> {
        Err(RepositoryError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> RepositoryResult<()> {
        Err(RepositoryError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> RepositoryResult<()> {
        Err(RepositoryError::Unavailable)
    }
}
