//! Option store implementations.
//!
//! Keyboards persist their options as slash-separated key paths
//! (`"display/tonos"`).  [`TomlOptionStore`] writes them into one TOML file
//! per keyboard, one quoted key per full path:
//!
//! ```toml
//! option_ligature = "1"
//! "display/tonos" = "0"
//! "display/tonos/mode" = "2"
//! ```
//!
//! A path and its sub-paths are independent keys, so `display/tonos` keeps
//! its own value next to `display/tonos/mode`.  Writing one never touches the
//! other.  Hand-written files that use nested tables are still read; each
//! leaf is reported under its joined path.
//!
//! Every write is saved to disk immediately; there is no batching, so a
//! crash never loses an acknowledged option.
//!
//! [`MemoryOptionStore`] keeps the same data in a shared map and is used by
//! tests and by hosts without a writable configuration directory.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use toml::{Table, Value};
use tracing::debug;

use crate::application::options::{OptionStore, OptionStoreProvider, StoreError};

/// Separator between key path segments.
pub const PATH_SEPARATOR: char = '/';

fn validate_path(path: &str) -> Result<(), StoreError> {
    if path.split(PATH_SEPARATOR).any(str::is_empty) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

// ── TOML file store ───────────────────────────────────────────────────────────

/// Option store backed by `<dir>/<keyboard_id>.toml`.
#[derive(Debug)]
pub struct TomlOptionStore {
    path: PathBuf,
    table: Table,
}

impl TomlOptionStore {
    /// Opens the store at `path`; a missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system errors other than "not
    /// found" and [`StoreError::Format`] if the file is not valid TOML.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let table = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .parse::<Table>()
                .map_err(|e| StoreError::Format(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, table })
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            toml::to_string_pretty(&self.table).map_err(|e| StoreError::Format(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl OptionStore for TomlOptionStore {
    fn set_value_by_path(&mut self, path: &str, value: &str) -> Result<(), StoreError> {
        validate_path(path)?;
        self.table
            .insert(path.to_string(), Value::String(value.to_string()));

        self.save()?;
        debug!(path = %self.path.display(), key = path, "option written");
        Ok(())
    }

    fn values(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        flatten(&self.table, "", &mut out);
        out
    }
}

fn flatten(table: &Table, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{key}")
        };
        match value {
            Value::Table(nested) => flatten(nested, &path, out),
            Value::String(text) => out.push((path, text.clone())),
            other => out.push((path, other.to_string())),
        }
    }
}

/// Opens [`TomlOptionStore`]s under one directory.
#[derive(Debug, Clone)]
pub struct TomlOptionStoreProvider {
    dir: PathBuf,
}

impl TomlOptionStoreProvider {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file holding `keyboard_id`'s options.
    pub fn store_path(&self, keyboard_id: &str) -> PathBuf {
        self.dir.join(format!("{keyboard_id}.toml"))
    }
}

impl OptionStoreProvider for TomlOptionStoreProvider {
    fn open(&self, keyboard_id: &str) -> Result<Box<dyn OptionStore>, StoreError> {
        Ok(Box::new(TomlOptionStore::open(self.store_path(keyboard_id))?))
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Options of every keyboard, keyed by keyboard id then key path.
pub type SharedOptions = Arc<Mutex<HashMap<String, BTreeMap<String, String>>>>;

/// Option store that lives only in memory.
#[derive(Debug, Clone)]
pub struct MemoryOptionStore {
    keyboard_id: String,
    shared: SharedOptions,
}

impl OptionStore for MemoryOptionStore {
    fn set_value_by_path(&mut self, path: &str, value: &str) -> Result<(), StoreError> {
        validate_path(path)?;
        let mut all = self
            .shared
            .lock()
            .map_err(|_| StoreError::Format("option map lock poisoned".to_string()))?;
        all.entry(self.keyboard_id.clone())
            .or_default()
            .insert(path.to_string(), value.to_string());
        Ok(())
    }

    fn values(&self) -> Vec<(String, String)> {
        self.shared
            .lock()
            .ok()
            .and_then(|all| {
                all.get(&self.keyboard_id).map(|values| {
                    values
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect()
                })
            })
            .unwrap_or_default()
    }
}

/// Hands out [`MemoryOptionStore`]s that share one map.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionStoreProvider {
    shared: SharedOptions,
}

impl MemoryOptionStoreProvider {
    /// The map behind every store this provider opens.
    pub fn shared(&self) -> SharedOptions {
        Arc::clone(&self.shared)
    }
}

impl OptionStoreProvider for MemoryOptionStoreProvider {
    fn open(&self, keyboard_id: &str) -> Result<Box<dyn OptionStore>, StoreError> {
        Ok(Box::new(MemoryOptionStore {
            keyboard_id: keyboard_id.to_string(),
            shared: self.shared(),
        }))
    }
}
