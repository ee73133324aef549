use std::{
    collections::BTreeMap, path::{Path, PathBuf}, sync::{Arc, Mutex, RwLock}
};

use tracing::debug;

use crate::{StoreError, StoreResult};

/// Key/value persistence used by the session store.
///
/// Implementations must be cheap to share across tasks; every call is a
/// short, synchronous operation.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
    fn clear(&self) -> StoreResult<()>;
}

/// Storage backend type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// JSON file on disk - persists across process runs
    File(PathBuf),
    /// Process memory - cleared when the process exits
    Memory,
    /// No-op mode - for contexts without any client-side storage
    None,
}

impl StorageType {
    pub fn open(&self) -> Arc<dyn StorageBackend> {
        match self {
            StorageType::File(path) => Arc::new(FileStorage::new(path.clone())),
            StorageType::Memory => Arc::new(MemoryStorage::default()),
            StorageType::None => Arc::new(NoopStorage),
        }
    }
}

/// In-process map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.keys().cloned().collect())
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }
}

/// Reads return nothing and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl StorageBackend for NoopStorage {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn clear(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A JSON object of string values in a single file.
///
/// The whole file is rewritten on every change through a sibling temp file
/// and a rename. On unix the file is kept at mode 0600 since it holds a
/// bearer token.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Serialize {
            key: "*".to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        let io_err = |source| StoreError::Io {
            path: tmp.clone(),
            source,
        };
        write_private(&tmp, json.as_bytes()).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = entries.len(), "session store saved");
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        if change(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.into_keys().collect())
    }

    fn clear(&self) -> StoreResult<()> {
        self.update(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            changed
        })
    }
}

fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Default location of the client session file.
pub fn default_store_path() -> PathBuf {
    preferred_data_dir().join("hrdesk").join("session.json")
}

fn preferred_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| fallback_home().join(".local/share"))
}

fn fallback_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
