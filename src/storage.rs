//! String key-value persistence, modelled on browser `localStorage`.
//!
//! Writes are synchronous and all-or-nothing. Callers own the store and pass
//! it where it is needed; nothing here is global.

use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend rejected the operation on {key}: {message}")]
    Backend { key: String, message: String },
    #[error("failed to read store at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write store at {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },
    #[error("value stored under {key} is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes a JSON value stored under `key`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: serde::Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StorageError};

    /// Keeps every entry in one JSON object on disk.
    ///
    /// Each write replaces the whole file through a temporary sibling.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
            let path = path.as_ref().to_path_buf();
            let entries = match fs::read_to_string(&path) {
                Ok(data) => {
                    serde_json::from_str(&data).map_err(|source| StorageError::Corrupt {
                        key: path.display().to_string(),
                        source,
                    })?
                }
                Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
                Err(source) => {
                    return Err(StorageError::ReadError {
                        path: path.display().to_string(),
                        source,
                    });
                }
            };

            Ok(Self { path, entries })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
            let write_error = |source| StorageError::WriteError {
                path: self.path.display().to_string(),
                source,
            };

            let data = serde_json::to_string_pretty(entries).map_err(|source| {
                StorageError::Corrupt {
                    key: self.path.display().to_string(),
                    source,
                }
            })?;
            let staging = self.path.with_extension("tmp");
            fs::write(&staging, data).map_err(write_error)?;
            fs::rename(&staging, &self.path).map_err(write_error)
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut next = self.entries.clone();
            next.insert(key.to_string(), value.to_string());
            self.flush(&next)?;
            self.entries = next;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            if !self.entries.contains_key(key) {
                return Ok(());
            }
            let mut next = self.entries.clone();
            next.remove(key);
            self.flush(&next)?;
            self.entries = next;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser_store::BrowserStore;

#[cfg(target_arch = "wasm32")]
mod browser_store {
    use super::{KeyValueStore, StorageError};

    /// `window.localStorage`.
    #[derive(Debug, Clone)]
    pub struct BrowserStore {
        storage: web_sys::Storage,
    }

    fn describe(value: wasm_bindgen::JsValue) -> String {
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"))
    }

    impl BrowserStore {
        pub fn open() -> Result<Self, StorageError> {
            let window = web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
            let storage = window
                .local_storage()
                .map_err(|error| StorageError::Unavailable(describe(error)))?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;

            Ok(Self { storage })
        }
    }

    impl KeyValueStore for BrowserStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|error| StorageError::Backend {
                    key: key.to_string(),
                    message: describe(error),
                })
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|error| StorageError::Backend {
                    key: key.to_string(),
                    message: describe(error),
                })
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|error| StorageError::Backend {
                    key: key.to_string(),
                    message: describe(error),
                })
        }
    }
}
