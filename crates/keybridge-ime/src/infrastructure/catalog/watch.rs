//! Catalog update detection.
//!
//! Packages are installed by a separate tool while the bridge is running.
//! Rather than rebuild on every request, the bridge polls the `kmp.json`
//! modification times and raises a "needs rebuild" flag when any is newer
//! than the catalog's timestamp.  The owner of the catalog checks the flag
//! and rebuilds at a convenient point; the watcher never touches the catalog
//! or any live session itself.

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

use tokio::{task::JoinHandle, time};
use tracing::{debug, info, warn};

use super::scan;

/// Returns `true` if any `kmp.json` under `data_dirs` is newer than
/// `timestamp`.  With no timestamp, any package counts as new.
pub fn check_for_update(
    data_dirs: &[PathBuf],
    package_subdir: &str,
    timestamp: Option<SystemTime>,
) -> bool {
    scan::metadata_files(data_dirs, package_subdir)
        .into_iter()
        .any(|(path, mtime)| {
            let newer = timestamp.map_or(true, |seen| mtime > seen);
            if newer {
                debug!(path = %path.display(), "package changed since last scan");
            }
            newer
        })
}

/// What the watcher polls and how often.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub data_dirs: Vec<PathBuf>,
    pub package_subdir: String,
    pub interval: Duration,
    /// Timestamp of the catalog being watched.
    pub timestamp: Option<SystemTime>,
}

/// Spawns a task that polls every `config.interval` and sets `needs_rebuild`
/// when a package changed.  The task exits once `running` is cleared.
pub fn spawn_update_watcher(
    config: WatchConfig,
    needs_rebuild: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(config.interval);

        loop {
            ticker.tick().await;
            if !running.load(Ordering::Relaxed) {
                break;
            }

            if needs_rebuild.load(Ordering::Relaxed) {
                continue;
            }

            if check_for_update(&config.data_dirs, &config.package_subdir, config.timestamp) {
                info!("keyboard packages changed; catalog needs rebuild");
                needs_rebuild.store(true, Ordering::Relaxed);
            }
        }

        debug!("catalog update watcher stopped");
    })
}

/// Waits for a watcher task to finish.
///
/// Returns `false`, after logging a warning, if the task panicked or was
/// cancelled instead of stopping on its own.
pub async fn join_update_watcher(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!("catalog update watcher ended abnormally: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir_with_package() -> (PathBuf, SystemTime) {
        let dir = std::env::temp_dir().join(format!("keybridge_watch_{}", uuid::Uuid::new_v4()));
        let package = dir.join("keyman/greek");
        std::fs::create_dir_all(&package).unwrap();
        let path = package.join("kmp.json");
        std::fs::write(&path, "{}").unwrap();
        let mtime = scan::modified_time(&path).unwrap();
        (dir, mtime)
    }

    #[test]
    fn test_package_newer_than_timestamp_is_an_update() {
        // Arrange
        let (dir, mtime) = data_dir_with_package();
        let earlier = mtime.checked_sub(Duration::from_secs(5));

        // Act / Assert
        assert!(check_for_update(&[dir], "keyman", earlier));
    }

    #[test]
    fn test_package_at_timestamp_is_not_an_update() {
        let (dir, mtime) = data_dir_with_package();

        assert!(!check_for_update(&[dir], "keyman", Some(mtime)));
    }

    #[test]
    fn test_any_package_is_an_update_without_timestamp() {
        let (dir, _) = data_dir_with_package();

        assert!(check_for_update(&[dir], "keyman", None));
    }

    #[test]
    fn test_empty_data_dir_is_never_an_update() {
        let dir = std::env::temp_dir().join(format!("keybridge_watch_{}", uuid::Uuid::new_v4()));

        assert!(!check_for_update(&[dir], "keyman", None));
    }

    #[tokio::test]
    async fn test_watcher_flags_new_package_then_stops() {
        // Arrange
        let (dir, _) = data_dir_with_package();
        let config = WatchConfig {
            data_dirs: vec![dir],
            package_subdir: "keyman".to_string(),
            interval: Duration::from_millis(10),
            timestamp: None,
        };
        let needs_rebuild = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        // Act
        let handle = spawn_update_watcher(config, Arc::clone(&needs_rebuild), Arc::clone(&running));
        time::sleep(Duration::from_millis(50)).await;
        running.store(false, Ordering::Relaxed);
        let joined = time::timeout(Duration::from_secs(1), handle).await;

        // Assert
        assert!(needs_rebuild.load(Ordering::Relaxed));
        assert!(joined.is_ok(), "watcher must exit once running is cleared");
    }

    #[tokio::test]
    async fn test_join_reports_cancelled_watcher() {
        // Arrange
        let (dir, _) = data_dir_with_package();
        let config = WatchConfig {
            data_dirs: vec![dir],
            package_subdir: "keyman".to_string(),
            interval: Duration::from_secs(60),
            timestamp: Some(SystemTime::now()),
        };
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_update_watcher(config, Arc::new(AtomicBool::new(false)), running);

        // Act
        handle.abort();
        let clean = join_update_watcher(handle).await;

        // Assert
        assert!(!clean);
    }

    #[tokio::test]
    async fn test_join_reports_watcher_that_stopped_itself() {
        // Arrange
        let config = WatchConfig {
            data_dirs: Vec::new(),
            package_subdir: "keyman".to_string(),
            interval: Duration::from_millis(10),
            timestamp: None,
        };
        let running = Arc::new(AtomicBool::new(false));
        let handle = spawn_update_watcher(config, Arc::new(AtomicBool::new(false)), running);

        // Act
        let clean = join_update_watcher(handle).await;

        // Assert
        assert!(clean);
    }

    #[test]
    fn test_stopped_watcher_exits_without_flagging() {
        // Arrange
        let (dir, _) = data_dir_with_package();
        let config = WatchConfig {
            data_dirs: vec![dir],
            package_subdir: "keyman".to_string(),
            interval: Duration::from_millis(10),
            timestamp: None,
        };
        let needs_rebuild = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(false));

        // Act
        let flag = Arc::clone(&needs_rebuild);
        let result =
            tokio_test::block_on(async move { spawn_update_watcher(config, flag, running).await });

        // Assert
        assert!(result.is_ok());
        assert!(!needs_rebuild.load(Ordering::Relaxed));
    }
}
