//! File-system layout of installed packages.
//!
//! ```text
//! <data_dir>/<package_subdir>/<package>/kmp.json
//! ```
//!
//! The same package name may exist under several data directories (a user
//! install shadowing a system install, for example).

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::debug;

/// Name of the metadata file inside each package directory.
pub const METADATA_FILE: &str = "kmp.json";

/// Every package directory name under any of `data_dirs`, sorted and
/// de-duplicated.  Unreadable directories are skipped.
pub fn package_names(data_dirs: &[PathBuf], package_subdir: &str) -> Vec<String> {
    let mut names = BTreeSet::new();

    for data_dir in data_dirs {
        let root = data_dir.join(package_subdir);
        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %root.display(), "skipping package root: {e}");
                continue;
            }
        };

        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                if let Some(name) = entry.file_name().to_str() {
                    names.insert(name.to_string());
                }
            }
        }
    }

    names.into_iter().collect()
}

/// Directory of `package` under `data_dir`.
pub fn package_dir(data_dir: &Path, package_subdir: &str, package: &str) -> PathBuf {
    data_dir.join(package_subdir).join(package)
}

/// Modification time of `path`, or `None` if it does not exist.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Every existing `kmp.json` with its modification time, in data-directory
/// order within each package.
pub fn metadata_files(data_dirs: &[PathBuf], package_subdir: &str) -> Vec<(PathBuf, SystemTime)> {
    package_names(data_dirs, package_subdir)
        .iter()
        .flat_map(|package| {
            data_dirs.iter().filter_map(move |data_dir| {
                let path = package_dir(data_dir, package_subdir, package).join(METADATA_FILE);
                modified_time(&path).map(|mtime| (path, mtime))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_data_dir() -> PathBuf {
        std::env::temp_dir().join(format!("keybridge_scan_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_package_names_merge_and_sort_across_dirs() {
        // Arrange
        let user = temp_data_dir();
        let system = temp_data_dir();
        std::fs::create_dir_all(user.join("keyman/tamil")).unwrap();
        std::fs::create_dir_all(system.join("keyman/greek")).unwrap();
        std::fs::create_dir_all(system.join("keyman/tamil")).unwrap();
        std::fs::write(system.join("keyman/not_a_package.txt"), "").unwrap();

        // Act
        let names = package_names(&[user, system], "keyman");

        // Assert
        assert_eq!(names, vec!["greek".to_string(), "tamil".to_string()]);
    }

    #[test]
    fn test_missing_roots_yield_no_packages() {
        assert!(package_names(&[temp_data_dir()], "keyman").is_empty());
    }

    #[test]
    fn test_metadata_files_skip_packages_without_kmp_json() {
        // Arrange
        let dir = temp_data_dir();
        std::fs::create_dir_all(dir.join("keyman/empty")).unwrap();
        std::fs::create_dir_all(dir.join("keyman/greek")).unwrap();
        std::fs::write(dir.join("keyman/greek/kmp.json"), "{}").unwrap();

        // Act
        let files = metadata_files(&[dir.clone()], "keyman");

        // Assert
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, dir.join("keyman/greek/kmp.json"));
    }
}
