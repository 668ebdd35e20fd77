//! Integration tests for package discovery.
//!
//! Builds package trees on disk and checks the catalog scan, the
//! input-method listing and the update check through the public API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use keybridge_ime::{
    application::{
        host::InputContextId,
        input_methods::{list_input_methods, FALLBACK_ICON},
        session_manager::SessionManager,
    },
    infrastructure::{
        catalog::{scan::modified_time, watch::check_for_update, Catalog},
        engine::mock::{ScriptedEngine, ScriptedKeyboard},
        host::mock::RecordingHost,
        option_store::MemoryOptionStoreProvider,
    },
};

fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("keybridge_catalog_{}", uuid::Uuid::new_v4()))
}

/// Writes `<data_dir>/keyman/<package>/kmp.json` plus a `.kmx` for `id`.
fn write_package(data_dir: &Path, package: &str, id: &str, version: &str) -> PathBuf {
    let dir = data_dir.join("keyman").join(package);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{id}.kmx")), b"KXTS").unwrap();
    let kmp = format!(
        r#"{{
            "system": {{ "fileVersion": "7.0" }},
            "files": [
                {{ "name": "{id}.kmx", "description": "Keyboard {id}" }},
                {{ "name": "readme.htm", "description": "Readme" }}
            ],
            "options": {{ "readmeFile": "readme.htm", "graphicFile": "splash.png" }},
            "keyboards": [
                {{ "id": "{id}", "name": "{id} keyboard", "version": "{version}",
                   "languages": [ {{ "id": "el", "name": "Greek" }} ] }}
            ]
        }}"#
    );
    let path = dir.join("kmp.json");
    std::fs::write(&path, kmp).unwrap();
    path
}

#[test]
fn test_scan_keeps_newest_version_across_data_dirs() {
    // Arrange
    let system = temp_data_dir();
    let user = temp_data_dir();
    write_package(&system, "greek", "greek", "1.0");
    write_package(&user, "greek", "greek", "1.1");

    // Act
    let catalog = Catalog::scan(&[system, user.clone()], "keyman");

    // Assert
    let greek = catalog.get("greek").unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(greek.version, "1.1");
    assert_eq!(greek.base_dir, user.join("keyman/greek"));
}

#[test]
fn test_scan_keeps_first_data_dir_on_equal_version() {
    let first = temp_data_dir();
    let second = temp_data_dir();
    write_package(&first, "greek", "greek", "1.0");
    write_package(&second, "greek", "greek", "1.0");

    let catalog = Catalog::scan(&[first.clone(), second], "keyman");

    assert_eq!(catalog.get("greek").unwrap().base_dir, first.join("keyman/greek"));
}

#[test]
fn test_scan_keeps_only_listed_readme_and_graphic() {
    let dir = temp_data_dir();
    write_package(&dir, "greek", "greek", "1.0");

    let catalog = Catalog::scan(&[dir], "keyman");

    let greek = catalog.get("greek").unwrap();
    assert_eq!(greek.readme.as_deref(), Some("readme.htm"));
    assert_eq!(greek.graphic, None);
}

#[test]
fn test_scan_skips_broken_package_and_keeps_others() {
    // Arrange
    let dir = temp_data_dir();
    write_package(&dir, "greek", "greek", "1.0");
    let broken = dir.join("keyman/broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("kmp.json"), "{ not json").unwrap();

    // Act
    let catalog = Catalog::scan(&[dir], "keyman");

    // Assert
    assert_eq!(catalog.len(), 1);
    assert!(catalog.timestamp().is_some());
}

#[test]
fn test_listing_uses_package_icon_or_fallback() {
    // Arrange
    let dir = temp_data_dir();
    write_package(&dir, "greek", "greek", "1.0");
    write_package(&dir, "tamil", "tamil", "2.0");
    let greek_icon = dir.join("keyman/greek/greek.icon.png");
    std::fs::write(&greek_icon, b"PNG").unwrap();
    let catalog = Catalog::scan(&[dir], "keyman");

    // Act
    let entries = list_input_methods(catalog.keyboards());

    // Assert
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].unique_name, "keybridge:greek");
    assert_eq!(entries[0].display_name, "greek keyboard (Keyman)");
    assert_eq!(entries[0].language, "el");
    assert_eq!(entries[0].icon, greek_icon.to_string_lossy());
    assert_eq!(entries[1].keyboard_id(), "tamil");
    assert_eq!(entries[1].icon, FALLBACK_ICON);
}

#[test]
fn test_update_check_against_catalog_timestamp() {
    // Arrange
    let dir = temp_data_dir();
    let kmp = write_package(&dir, "greek", "greek", "1.0");
    let catalog = Catalog::scan(&[dir.clone()], "keyman");
    let mtime = modified_time(&kmp).unwrap();

    // Act / Assert
    assert_eq!(catalog.timestamp(), Some(mtime));
    assert!(!check_for_update(&[dir.clone()], "keyman", catalog.timestamp()));
    assert!(check_for_update(
        &[dir],
        "keyman",
        mtime.checked_sub(Duration::from_secs(1))
    ));
}

#[test]
fn test_catalog_keyboards_can_be_activated() {
    // Arrange
    let dir = temp_data_dir();
    write_package(&dir, "greek", "greek", "1.0");
    let catalog = Catalog::scan(&[dir], "keyman");
    let engine = ScriptedEngine::new().with_keyboard("greek", ScriptedKeyboard::new());
    let journal = engine.journal();
    let mut manager = SessionManager::new(
        Box::new(engine),
        Box::new(MemoryOptionStoreProvider::default()),
        Vec::new(),
    );
    for record in catalog.keyboards() {
        manager.register_keyboard(record.clone());
    }

    // Act
    let activated = manager.activate("greek", InputContextId::new(), &RecordingHost::with_text(""));

    // Assert
    assert!(activated);
    assert_eq!(journal.lock().unwrap().sessions_created, 1);
}
