//! Keyboard package catalog.
//!
//! Scans the configured data directories for installed packages, parses each
//! package's `kmp.json` and keeps one [`KeyboardRecord`] per keyboard id.
//!
//! # Rebuild rules (for beginners)
//!
//! The same keyboard can be installed more than once, e.g. version `1.0`
//! system-wide and version `1.1` in the user's home.  The catalog keeps the
//! record whose version string is greatest.  Versions are compared as plain
//! strings, not as numbers, so `"10.0"` loses to `"9.0"`.  When two copies
//! carry the same version the one found first (earlier data directory) wins.
//!
//! The catalog also remembers the newest `kmp.json` modification time it
//! saw.  [`watch::check_for_update`] compares against it to decide whether a
//! rebuild is needed.

pub mod kmp_metadata;
pub mod scan;
pub mod watch;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::SystemTime,
};

use keybridge_core::KeyboardRecord;
use thiserror::Error;
use tracing::{debug, info, warn};

use self::kmp_metadata::KmpMetadata;

/// Error type for loading one package.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid package metadata in {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the keyboards of the package whose metadata is at `metadata_path`.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read and
/// [`CatalogError::Metadata`] if it is not valid JSON.
pub fn load_package(metadata_path: &Path) -> Result<Vec<KeyboardRecord>, CatalogError> {
    let content = std::fs::read_to_string(metadata_path).map_err(|source| CatalogError::Io {
        path: metadata_path.to_path_buf(),
        source,
    })?;
    let meta = KmpMetadata::parse(&content).map_err(|source| CatalogError::Metadata {
        path: metadata_path.to_path_buf(),
        source,
    })?;

    let base_dir = metadata_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(meta.records(base_dir))
}

/// Installed keyboards keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    keyboards: BTreeMap<String, KeyboardRecord>,
    timestamp: Option<SystemTime>,
}

impl Catalog {
    /// Builds the catalog from every package under `data_dirs`.
    ///
    /// Packages whose metadata cannot be read are skipped with a warning.
    pub fn scan(data_dirs: &[PathBuf], package_subdir: &str) -> Self {
        let mut catalog = Catalog::default();

        for (path, mtime) in scan::metadata_files(data_dirs, package_subdir) {
            catalog.timestamp = catalog.timestamp.max(Some(mtime));

            match load_package(&path) {
                Ok(records) => {
                    for record in records {
                        catalog.insert(record);
                    }
                }
                Err(e) => warn!("skipping package: {e}"),
            }
        }

        info!("catalog built with {} keyboard(s)", catalog.len());
        catalog
    }

    /// Adds `record` unless a record with the same id and an equal or
    /// greater version is already present.  Returns `true` if it was stored.
    pub fn insert(&mut self, record: KeyboardRecord) -> bool {
        if let Some(existing) = self.keyboards.get(&record.id) {
            if !record.supersedes(existing) {
                debug!(
                    id = %record.id,
                    kept = %existing.version,
                    ignored = %record.version,
                    "keeping existing keyboard version"
                );
                return false;
            }
        }
        self.keyboards.insert(record.id.clone(), record);
        true
    }

    /// Records in id order.
    pub fn keyboards(&self) -> impl Iterator<Item = &KeyboardRecord> {
        self.keyboards.values()
    }

    pub fn get(&self, id: &str) -> Option<&KeyboardRecord> {
        self.keyboards.get(id)
    }

    pub fn len(&self) -> usize {
        self.keyboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }

    /// Newest `kmp.json` modification time seen by the last scan.
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, version: &str, base: &str) -> KeyboardRecord {
        KeyboardRecord {
            id: id.to_string(),
            name: id.to_string(),
            version: version.to_string(),
            languages: Vec::new(),
            base_dir: PathBuf::from(base),
            readme: None,
            graphic: None,
        }
    }

    #[test]
    fn test_newer_version_replaces_older() {
        // Arrange
        let mut catalog = Catalog::default();
        catalog.insert(record("greek", "1.0", "/system"));

        // Act
        let stored = catalog.insert(record("greek", "1.1", "/user"));

        // Assert
        assert!(stored);
        assert_eq!(catalog.get("greek").unwrap().base_dir, PathBuf::from("/user"));
    }

    #[test]
    fn test_older_version_is_ignored() {
        let mut catalog = Catalog::default();
        catalog.insert(record("greek", "2.0", "/user"));

        assert!(!catalog.insert(record("greek", "1.0", "/system")));
        assert_eq!(catalog.get("greek").unwrap().version, "2.0");
    }

    #[test]
    fn test_equal_version_keeps_first_seen() {
        let mut catalog = Catalog::default();
        catalog.insert(record("greek", "1.0", "/first"));

        catalog.insert(record("greek", "1.0", "/second"));

        assert_eq!(catalog.get("greek").unwrap().base_dir, PathBuf::from("/first"));
    }

    #[test]
    fn test_versions_compare_as_strings() {
        let mut catalog = Catalog::default();
        catalog.insert(record("greek", "9.0", "/nine"));

        catalog.insert(record("greek", "10.0", "/ten"));

        assert_eq!(catalog.get("greek").unwrap().version, "9.0");
    }

    #[test]
    fn test_load_package_reports_invalid_json() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("keybridge_pkg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("kmp.json");
        std::fs::write(&path, "{ broken").unwrap();

        // Act
        let result = load_package(&path);

        // Assert
        assert!(matches!(result, Err(CatalogError::Metadata { .. })));
    }

    #[test]
    fn test_load_package_missing_file_is_io_error() {
        let path = std::env::temp_dir()
            .join(format!("keybridge_pkg_{}", uuid::Uuid::new_v4()))
            .join("kmp.json");

        assert!(matches!(load_package(&path), Err(CatalogError::Io { .. })));
    }
}
