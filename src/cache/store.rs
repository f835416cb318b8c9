//! Backing stores for the expiring cache
//!
//! A store only knows how to read, write and remove text under a key. All
//! expiry and serialization logic lives in `ExpiringCache`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;

/// Text key-value storage capability
pub trait TextStore {
    /// Returns the stored text, or `None` if nothing is stored under `key`
    fn read_text(&self, key: &str) -> io::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn write_text(&self, key: &str, value: &str) -> io::Result<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Stores each key as a JSON file in a cache directory
///
/// Uses `~/.cache/wxalert/` on Linux, or the equivalent XDG path on other
/// platforms, unless a directory is given explicitly.
#[derive(Debug, Clone)]
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a store in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "wxalert")?;
        Some(Self {
            cache_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to the file backing `key`
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so keys
    /// can never escape the cache directory.
    fn cache_path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{}.json", file_stem))
    }
}

impl TextStore for FileStore {
    fn read_text(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.cache_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_text(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(self.cache_path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.cache_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process store with an optional quota on the total stored bytes
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once the stored values would
    /// exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl TextStore for MemoryStore {
    fn read_text(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write_text(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock();

        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if used + value.len() > quota {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("storage quota of {} bytes exceeded", quota),
                ));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (store, temp_dir) = create_test_store();

        store.write_text("weather_1_2", "{}").expect("Write should succeed");

        assert!(temp_dir.path().join("weather_1_2.json").exists());
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let store = FileStore::with_dir(nested_path.clone());

        store.write_text("key", "value").expect("Write should succeed");

        assert!(nested_path.join("key.json").exists());
    }

    #[test]
    fn test_read_missing_key_is_none() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.read_text("nope").expect("Read should succeed").is_none());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.remove("nope").is_ok());
    }

    #[test]
    fn test_keys_are_sanitized() {
        let (store, temp_dir) = create_test_store();

        store
            .write_text("../weather 49.28/-123.12", "x")
            .expect("Write should succeed");

        assert!(temp_dir.path().join(".._weather_49.28_-123.12.json").exists());
        assert_eq!(
            store.read_text("../weather 49.28/-123.12").unwrap().as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            assert!(store.dir().to_string_lossy().contains("wxalert"));
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_memory_store_roundtrip_and_remove() {
        let store = MemoryStore::new();
        store.write_text("a", "1").unwrap();
        assert_eq!(store.read_text("a").unwrap().as_deref(), Some("1"));

        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(4);
        store.write_text("a", "1234").unwrap();

        let err = store.write_text("b", "5").unwrap_err();
        assert!(err.to_string().contains("quota"));
        assert!(!store.contains("b"));
    }

    #[test]
    fn test_memory_store_quota_counts_overwrite_once() {
        let store = MemoryStore::with_quota(4);
        store.write_text("a", "1234").unwrap();
        assert!(store.write_text("a", "abcd").is_ok());
        assert_eq!(store.len(), 1);
    }
}
