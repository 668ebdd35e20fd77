//! Input-method entries offered to the host for each catalog keyboard.

use std::path::Path;

use keybridge_core::KeyboardRecord;
use serde::{Deserialize, Serialize};

/// Prefix of every unique input-method name.
pub const INPUT_METHOD_PREFIX: &str = "keybridge:";
/// Icon name used when a package ships no icon of its own.
pub const FALLBACK_ICON: &str = "keybridge-config";
/// Icon file suffixes tried in order.
const ICON_SUFFIXES: [&str; 2] = [".bmp.png", ".icon.png"];

/// One selectable input method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMethodEntry {
    /// `keybridge:<keyboard id>`.
    pub unique_name: String,
    /// `<keyboard name> (Keyman)`.
    pub display_name: String,
    /// Primary language tag, possibly empty.
    pub language: String,
    /// Icon file path, or [`FALLBACK_ICON`].
    pub icon: String,
    pub configurable: bool,
}

impl InputMethodEntry {
    /// Builds the entry for `record`, probing its package for an icon.
    pub fn from_record(record: &KeyboardRecord) -> Self {
        Self {
            unique_name: format!("{INPUT_METHOD_PREFIX}{}", record.id),
            display_name: format!("{} (Keyman)", record.name),
            language: record.language().to_string(),
            icon: find_icon(&record.base_dir, &record.id),
            configurable: true,
        }
    }

    /// Keyboard id encoded in the unique name.
    pub fn keyboard_id(&self) -> &str {
        self.unique_name
            .strip_prefix(INPUT_METHOD_PREFIX)
            .unwrap_or(&self.unique_name)
    }
}

fn find_icon(base_dir: &Path, id: &str) -> String {
    ICON_SUFFIXES
        .iter()
        .map(|suffix| base_dir.join(format!("{id}{suffix}")))
        .find(|path| path.is_file())
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ICON.to_string())
}

/// Lists one entry per keyboard, sorted by unique name.
pub fn list_input_methods<'a, I>(records: I) -> Vec<InputMethodEntry>
where
    I: IntoIterator<Item = &'a KeyboardRecord>,
{
    let mut entries: Vec<InputMethodEntry> =
        records.into_iter().map(InputMethodEntry::from_record).collect();
    entries.sort_by(|a, b| a.unique_name.cmp(&b.unique_name));
    entries
}
