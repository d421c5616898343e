//! Storage backends for the cache.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::CacheError;

/// Raw byte-level key-value storage.
///
/// [`Cache`](crate::Cache) layers JSON serialization on top of a backend.
pub trait Backend: Send + Sync {
    /// Get the raw bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store raw bytes under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// List all keys in the store, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-process backend.
///
/// Clones share the same underlying map, so a clone kept by a test observes
/// every write made through the cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Check if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::StoreError(format!("memory store poisoned: {}", e)))
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock()?.contains_key(key))
    }
}

/// Directory-backed backend storing one file per key.
///
/// Keys are percent-encoded into file names. Writes go to a hidden temporary
/// file first and are renamed into place, so a crash mid-write never leaves a
/// truncated value behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Directory holding the stored values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(encode_key(key)))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::StoreError(format!("{}: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{}.tmp", encode_key(key)));

        fs::write(&tmp, value)
            .map_err(|e| CacheError::StoreError(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| CacheError::StoreError(format!("{}: {}", path.display(), e)))?;

        debug!(key, bytes = value.len(), "wrote value to disk");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::StoreError(format!("{}: {}", path.display(), e))),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| CacheError::StoreError(format!("{}: {}", self.root.display(), e)))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::StoreError(e.to_string()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Temporary files are hidden and unprefixed; so is anything foreign.
            if !name.starts_with(FILE_PREFIX) {
                continue;
            }
            if let Some(key) = decode_key(name) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Prefix on every data file name. Encoded keys may start with `.`, so the
/// prefix keeps them from becoming hidden or special names.
const FILE_PREFIX: &str = "v-";

/// Percent-encode a key into a portable file name.
fn encode_key(key: &str) -> String {
    format!("{}{}", FILE_PREFIX, urlencoding::encode(key))
}

/// Reverse [`encode_key`]. Returns `None` for names it could not have produced.
fn decode_key(name: &str) -> Option<String> {
    let encoded = name.strip_prefix(FILE_PREFIX)?;
    let key = urlencoding::decode(encoded).ok()?.into_owned();
    if key.is_empty() || urlencoding::encode(&key) != encoded {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        backend.set("a", b"one").unwrap();

        assert_eq!(backend.get("a").unwrap(), Some(b"one".to_vec()));
        assert!(backend.exists("a").unwrap());
        assert_eq!(backend.len(), 1);

        backend.delete("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_memory_backend_clones_share_state() {
        let backend = MemoryBackend::new();
        let observer = backend.clone();

        backend.set("shared", b"value").unwrap();

        assert_eq!(observer.get("shared").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_memory_backend_delete_missing_key() {
        let backend = MemoryBackend::new();
        assert!(backend.delete("missing").is_ok());
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart:user 1", b"[1,2,3]").unwrap();
        assert_eq!(
            backend.get("cart:user 1").unwrap(),
            Some(b"[1,2,3]".to_vec())
        );
        assert_eq!(backend.keys().unwrap(), vec!["cart:user 1".to_string()]);

        backend.delete("cart:user 1").unwrap();
        assert_eq!(backend.get("cart:user 1").unwrap(), None);
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileBackend::open(dir.path())
            .unwrap()
            .set("persisted", b"yes")
            .unwrap();

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.get("persisted").unwrap(), Some(b"yes".to_vec()));
    }

    #[test]
    fn test_file_backend_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileBackend::open(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(backend.root(), nested.as_path());
    }

    #[test]
    fn test_file_backend_rejects_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        assert!(matches!(
            backend.set("", b"x"),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_file_backend_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::write(dir.path().join(".hidden.tmp"), b"partial").unwrap();
        fs::write(dir.path().join("real"), b"unprefixed").unwrap();
        backend.set("real", b"1").unwrap();

        assert_eq!(backend.keys().unwrap(), vec!["real".to_string()]);
        assert_eq!(backend.get("real").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_file_backend_dot_keys_stay_visible() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.set(".", b"dot").unwrap();
        backend.set(".x", b"hidden?").unwrap();

        assert_eq!(backend.get(".").unwrap(), Some(b"dot".to_vec()));
        assert_eq!(backend.keys().unwrap(), vec![".".to_string(), ".x".to_string()]);
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("cabinet-fragments-cart"), "v-cabinet-fragments-cart");
        assert_eq!(encode_key("a:b"), "v-a%3Ab");
        assert_eq!(encode_key("."), "v-.");
        assert_eq!(encode_key(".x"), "v-.x");
        assert_eq!(decode_key("v-a%3Ab").as_deref(), Some("a:b"));
        assert_eq!(decode_key("v-."), Some(".".to_string()));
        assert_eq!(decode_key("a%3Ab"), None);
        assert_eq!(decode_key("v-bad%zz"), None);
        assert_eq!(decode_key("v-"), None);
    }
}
