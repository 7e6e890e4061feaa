use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Get/set/remove capability so saved listings and sessions stay storage-agnostic.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error enumeration for key-value store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Durable store writing each key to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened file-backed store");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(staging, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("homefinder-{label}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::default();
        assert_eq!(store.get("login_user").expect("get"), None);
        store.set("login_user", "{}".to_string()).expect("set");
        assert_eq!(store.get("login_user").expect("get").as_deref(), Some("{}"));
        store.remove("login_user").expect("remove");
        assert_eq!(store.get("login_user").expect("get"), None);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::default();
        let other = store.clone();
        store.set("saved_listings", "[]".to_string()).expect("set");
        assert!(other.get("saved_listings").expect("get").is_some());
    }

    #[test]
    fn file_store_persists_across_handles() {
        let dir = scratch_dir("persist");
        let store = FileStore::open(&dir).expect("store opens");
        store
            .set("saved_listings", "[\"1\"]".to_string())
            .expect("write succeeds");

        let reopened = FileStore::open(&dir).expect("store reopens");
        assert_eq!(
            reopened.get("saved_listings").expect("read").as_deref(),
            Some("[\"1\"]")
        );

        reopened.remove("saved_listings").expect("remove");
        reopened.remove("saved_listings").expect("second remove is a no-op");
        assert_eq!(reopened.get("saved_listings").expect("read"), None);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = scratch_dir("keys");
        let store = FileStore::open(&dir).expect("store opens");
        let err = store
            .set("../escape", "x".to_string())
            .expect_err("traversal rejected");
        assert!(matches!(err, StoreError::InvalidKey(_)));
        fs::remove_dir_all(dir).ok();
    }
}
