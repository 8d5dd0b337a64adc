use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};

/// String key/value backend for the chart store.
///
/// Mirrors a browser-style local storage: flat keys, string blobs, no
/// transactions.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> ChartResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> ChartResult<()>;
    /// Returns whether the key existed.
    fn remove(&mut self, key: &str) -> ChartResult<bool>;
}

/// In-process storage, insertion ordered.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: IndexMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> ChartResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ChartResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ChartResult<bool> {
        Ok(self.entries.shift_remove(key).is_some())
    }
}

/// One `<key>.json` file per entry under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn open(root: impl Into<PathBuf>) -> ChartResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            ChartError::Storage(format!("failed to create `{}`: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> ChartResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ChartError::Storage(format!(
                "failed to read `{}`: {err}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: String) -> ChartResult<()> {
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| {
            ChartError::Storage(format!("failed to write `{}`: {e}", path.display()))
        })
    }

    fn remove(&mut self, key: &str) -> ChartResult<bool> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ChartError::Storage(format!(
                "failed to remove `{}`: {err}",
                path.display()
            ))),
        }
    }
}
