//! `kmp.json` package metadata.
//!
//! A keyboard package ships a `kmp.json` describing the package and the
//! keyboards inside it:
//!
//! ```json
//! {
//!   "system": { "keymanDeveloperVersion": "15.0", "fileVersion": "7.0" },
//!   "info": { "name": { "description": "Greek" }, "version": { "description": "1.2" } },
//!   "files": [ { "name": "greek.kmx", "description": "Keyboard greek" } ],
//!   "options": { "readmeFile": "readme.htm" },
//!   "keyboards": [ { "id": "greek", "name": "Greek", "version": "1.2",
//!                    "languages": [ { "id": "el", "name": "Greek" } ] } ]
//! }
//! ```
//!
//! Parsing is best-effort.  Only invalid JSON is an error; a field with the
//! wrong type reads as an empty string, and entries that cannot be used
//! (a keyboard without an id, a file without a name) are dropped.

use std::{collections::BTreeMap, path::Path};

use keybridge_core::KeyboardRecord;
use serde_json::Value;

/// One keyboard listed in a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmpKeyboard {
    pub id: String,
    pub name: String,
    pub version: String,
    pub languages: Vec<(String, String)>,
}

/// Parsed contents of a `kmp.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KmpMetadata {
    pub keyman_developer_version: String,
    pub file_version: String,
    pub name: String,
    pub version: String,
    pub copyright: String,
    pub author: String,
    pub website: String,
    /// File name → description.
    pub files: BTreeMap<String, String>,
    /// Readme file, only when it is also listed in `files`.
    pub readme_file: Option<String>,
    /// Graphic file, only when it is also listed in `files`.
    pub graphic_file: Option<String>,
    /// Keyboards keyed by id.
    pub keyboards: BTreeMap<String, KmpKeyboard>,
}

/// String value of `key` in `value`, or `""` if absent or not a string.
fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// `info.<key>.description`.
fn info_description(root: &Value, key: &str) -> String {
    root.get("info")
        .and_then(|info| info.get(key))
        .map(|entry| text(entry, "description"))
        .unwrap_or_default()
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

impl KmpMetadata {
    /// Parses `kmp.json` content.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `content` is not valid JSON.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let root: Value = serde_json::from_str(content)?;

        let mut meta = KmpMetadata::default();

        if let Some(system) = root.get("system") {
            meta.keyman_developer_version = text(system, "keymanDeveloperVersion");
            meta.file_version = text(system, "fileVersion");
        }

        meta.name = info_description(&root, "name");
        meta.version = info_description(&root, "version");
        meta.copyright = info_description(&root, "copyright");
        meta.author = info_description(&root, "author");
        meta.website = info_description(&root, "website");

        for file in array(&root, "files") {
            let name = text(file, "name");
            if !name.is_empty() {
                meta.files.insert(name, text(file, "description"));
            }
        }

        if let Some(options) = root.get("options") {
            meta.readme_file = meta.listed(text(options, "readmeFile"));
            meta.graphic_file = meta.listed(text(options, "graphicFile"));
        }

        for keyboard in array(&root, "keyboards") {
            let id = text(keyboard, "id");
            if id.is_empty() || !meta.files.contains_key(&format!("{id}.kmx")) {
                continue;
            }

            let mut name = text(keyboard, "name");
            if name.is_empty() {
                name = id.clone();
            }

            let languages = array(keyboard, "languages")
                .iter()
                .map(|language| (text(language, "id"), text(language, "name")))
                .filter(|(tag, _)| !tag.is_empty())
                .collect();

            meta.keyboards.insert(
                id.clone(),
                KmpKeyboard {
                    id,
                    name,
                    version: text(keyboard, "version"),
                    languages,
                },
            );
        }

        Ok(meta)
    }

    fn listed(&self, file: String) -> Option<String> {
        self.files.contains_key(&file).then_some(file)
    }

    /// Catalog records for every keyboard, rooted at `base_dir`.
    pub fn records(&self, base_dir: &Path) -> Vec<KeyboardRecord> {
        self.keyboards
            .values()
            .map(|keyboard| KeyboardRecord {
                id: keyboard.id.clone(),
                name: keyboard.name.clone(),
                version: keyboard.version.clone(),
                languages: keyboard.languages.clone(),
                base_dir: base_dir.to_path_buf(),
                readme: self.readme_file.clone(),
                graphic: self.graphic_file.clone(),
            })
            .collect()
    }
}
