//! Catalog entry describing one installed keyboard.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Immutable description of an installed keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardRecord {
    /// Keyboard identifier; also the stem of its `.kmx` file.
    pub id: String,
    /// Display name (falls back to `id`).
    pub name: String,
    /// Version string as written in the package; compared lexicographically.
    pub version: String,
    /// `(language tag, language name)` pairs in package order.
    pub languages: Vec<(String, String)>,
    /// Directory holding the package's files.
    pub base_dir: PathBuf,
    /// Readme file relative to `base_dir`, when the package lists one.
    pub readme: Option<String>,
    /// Graphic file relative to `base_dir`, when the package lists one.
    pub graphic: Option<String>,
}

impl KeyboardRecord {
    /// Primary language tag, or `""` when the keyboard lists none.
    pub fn language(&self) -> &str {
        self.languages
            .first()
            .map(|(tag, _)| tag.as_str())
            .unwrap_or("")
    }

    /// Path of the compiled rule table (`<base_dir>/<id>.kmx`).
    pub fn kmx_path(&self) -> PathBuf {
        self.file_path("kmx")
    }

    /// Path of the optional LDML source (`<base_dir>/<id>.ldml`).
    pub fn ldml_path(&self) -> PathBuf {
        self.file_path("ldml")
    }

    /// Returns `true` if `self` should replace `other` in the catalog.
    ///
    /// Versions are compared as plain strings, so `"10.0"` sorts before
    /// `"9.0"`.
    pub fn supersedes(&self, other: &KeyboardRecord) -> bool {
        self.id == other.id && other.version < self.version
    }

    fn file_path(&self, extension: &str) -> PathBuf {
        Path::new(&self.base_dir).join(format!("{}.{extension}", self.id))
    }
}
