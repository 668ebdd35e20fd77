//! TOML-based configuration for the bridge.
//!
//! Reads `BridgeConfig` from `$XDG_CONFIG_HOME/keybridge/config.toml`
//! (falling back to `~/.config/keybridge/config.toml`).  Every field has a
//! default, so a missing file or a file that only sets one value both work.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [catalog]
//! data_dirs = ["/usr/share", "/home/me/.local/share"]
//! package_subdir = "keyman"
//! update_interval_secs = 10
//!
//! [environment]
//! platform = "linux desktop hardware native"
//! base_layout = "kbdus.dll"
//! base_layout_alt = "en-US"
//!
//! [options]
//! dir = "/home/me/.config/keybridge/options"
//! ```
//!
//! # Environment options (for beginners)
//!
//! Keyboard rules may behave differently per platform or per underlying
//! hardware layout ("if the base layout is French AZERTY, ...").  The
//! `[environment]` values are handed to every new engine session so those
//! rules see a consistent answer.

use std::path::{Path, PathBuf};

use keybridge_core::{OptionItem, OptionScope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{engine::KeyboardLoader, session_manager::SessionManager};
use crate::infrastructure::option_store::TomlOptionStoreProvider;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where keyboard packages are found and how often to look for new ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Data directories searched in order; earlier entries win ties.
    #[serde(default = "default_data_dirs")]
    pub data_dirs: Vec<PathBuf>,
    /// Subdirectory of each data directory holding one folder per package.
    #[serde(default = "default_package_subdir")]
    pub package_subdir: String,
    /// Seconds between catalog update checks.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
}

/// Environment options passed to every engine session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_base_layout")]
    pub base_layout: String,
    #[serde(default = "default_base_layout_alt")]
    pub base_layout_alt: String,
}

/// Where per-keyboard options are stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionsConfig {
    /// Directory for `<keyboard>.toml` files; defaults to `options/` under
    /// the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_package_subdir() -> String {
    "keyman".to_string()
}
fn default_update_interval_secs() -> u64 {
    10
}
fn default_platform() -> String {
    "linux desktop hardware native".to_string()
}
fn default_base_layout() -> String {
    "kbdus.dll".to_string()
}
fn default_base_layout_alt() -> String {
    "en-US".to_string()
}

/// XDG data directories: `$XDG_DATA_HOME` (or `~/.local/share`) first, then
/// `$XDG_DATA_DIRS` (or `/usr/local/share:/usr/share`).
fn default_data_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")));
    let system = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|dirs| !dirs.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());

    home.into_iter()
        .chain(
            system
                .split(':')
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        )
        .collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dirs: default_data_dirs(),
            package_subdir: default_package_subdir(),
            update_interval_secs: default_update_interval_secs(),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            base_layout: default_base_layout(),
            base_layout_alt: default_base_layout_alt(),
        }
    }
}

impl EnvironmentConfig {
    /// The environment as engine options (`platform`, `baseLayout`,
    /// `baseLayoutAlt`).
    pub fn option_items(&self) -> Vec<OptionItem> {
        vec![
            OptionItem::new(OptionScope::Environment, "platform", &self.platform),
            OptionItem::new(OptionScope::Environment, "baseLayout", &self.base_layout),
            OptionItem::new(OptionScope::Environment, "baseLayoutAlt", &self.base_layout_alt),
        ]
    }
}

impl BridgeConfig {
    /// Directory for per-keyboard option files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when no directory is
    /// configured and the platform config directory is unknown.
    pub fn options_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.options.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_dir()?.join("options")),
        }
    }

    /// Builds a [`SessionManager`] that stores options under
    /// [`options_dir`](Self::options_dir) and creates sessions with the
    /// configured environment.
    ///
    /// # Errors
    ///
    /// See [`options_dir`](Self::options_dir).
    pub fn session_manager(
        &self,
        loader: Box<dyn KeyboardLoader>,
    ) -> Result<SessionManager, ConfigError> {
        let stores = TomlOptionStoreProvider::new(self.options_dir()?);
        Ok(SessionManager::new(
            loader,
            Box::new(stores),
            self.environment.option_items(),
        ))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `BridgeConfig` from the platform path, or defaults if the file does
/// not exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `BridgeConfig` from `path`, returning `BridgeConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: BridgeConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &BridgeConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `$XDG_CONFIG_HOME/keybridge`, or `~/.config/keybridge`.
fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("keybridge"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
