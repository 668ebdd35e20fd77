//! keybridge command-line entry point.
//!
//! The bridge itself is a library driven by an input-method framework.  This
//! binary exposes the parts that make sense outside an editor: listing the
//! installed keyboards, checking whether the package catalog changed, and
//! watching for package installs.
//!
//! # Usage
//!
//! ```text
//! keybridge [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list          Print one input-method entry per installed keyboard
//!   check-update  Exit status 0 if packages changed since --since, 1 otherwise
//!   watch         Poll for package changes and rebuild the catalog
//!   init-config   Write the effective configuration to the config file
//!
//! Options:
//!   --config <PATH>     Config file [default: $XDG_CONFIG_HOME/keybridge/config.toml]
//!   --data-dir <DIR>    Data directory to scan (repeatable; replaces the configured list)
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                          |
//! |--------------------|--------------------------------------|
//! | `KEYBRIDGE_CONFIG` | Same as `--config`                   |
//! | `RUST_LOG`         | Overrides `[general] log_level`      |

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use keybridge_ime::application::input_methods::list_input_methods;
use keybridge_ime::infrastructure::{
    catalog::{
        watch::{check_for_update, join_update_watcher, spawn_update_watcher, WatchConfig},
        Catalog,
    },
    config::{self, BridgeConfig},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keystroke-to-text bridge for rule-based keyboards.
#[derive(Debug, Parser)]
#[command(name = "keybridge", about = "Keyboard package tools for the keybridge input method", version)]
struct Cli {
    /// Configuration file to read.
    #[arg(long, env = "KEYBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory to scan for packages; may be given more than once.
    #[arg(long = "data-dir")]
    data_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one input-method entry per installed keyboard.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Report whether any package changed after a Unix timestamp.
    CheckUpdate {
        /// Seconds since the Unix epoch of the last catalog build.
        #[arg(long)]
        since: u64,
    },
    /// Poll for package changes until interrupted.
    Watch,
    /// Write the effective configuration to the config file.
    InitConfig,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_file_path().context("locating config file")?,
    };
    let mut cfg = config::load_config_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if !cli.data_dirs.is_empty() {
        cfg.catalog.data_dirs = cli.data_dirs.clone();
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::List { json } => list(&cfg, json),
        Command::CheckUpdate { since } => {
            let since = SystemTime::UNIX_EPOCH + Duration::from_secs(since);
            let changed =
                check_for_update(&cfg.catalog.data_dirs, &cfg.catalog.package_subdir, Some(since));
            println!("{}", if changed { "changed" } else { "unchanged" });
            if !changed {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Watch => watch(cfg).await,
        Command::InitConfig => {
            config::save_config_to(&config_path, &cfg)
                .with_context(|| format!("writing {}", config_path.display()))?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn list(cfg: &BridgeConfig, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::scan(&cfg.catalog.data_dirs, &cfg.catalog.package_subdir);
    let entries = list_input_methods(catalog.keyboards());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{:<32} {:<8} {}",
            entry.unique_name, entry.language, entry.display_name
        );
    }
    Ok(())
}

/// Rebuilds the catalog whenever the watcher raises its flag, until Ctrl-C.
async fn watch(cfg: BridgeConfig) -> anyhow::Result<()> {
    let interval = Duration::from_secs(cfg.catalog.update_interval_secs.max(1));
    let needs_rebuild = Arc::new(AtomicBool::new(false));
    let running = Arc::new(AtomicBool::new(true));

    let mut catalog = Catalog::scan(&cfg.catalog.data_dirs, &cfg.catalog.package_subdir);
    let watch_config = |timestamp| WatchConfig {
        data_dirs: cfg.catalog.data_dirs.clone(),
        package_subdir: cfg.catalog.package_subdir.clone(),
        interval,
        timestamp,
    };
    let mut watcher = spawn_update_watcher(
        watch_config(catalog.timestamp()),
        Arc::clone(&needs_rebuild),
        Arc::clone(&running),
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    info!("watching {} data dir(s) every {interval:?}", cfg.catalog.data_dirs.len());

    let mut ticker = tokio::time::interval(interval);
    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
        if !needs_rebuild.swap(false, Ordering::Relaxed) {
            continue;
        }

        catalog = Catalog::scan(&cfg.catalog.data_dirs, &cfg.catalog.package_subdir);
        for entry in list_input_methods(catalog.keyboards()) {
            println!("{}", entry.unique_name);
        }

        // The watcher compares against a fixed timestamp; restart it with the
        // new one.
        watcher.abort();
        watcher = spawn_update_watcher(
            watch_config(catalog.timestamp()),
            Arc::clone(&needs_rebuild),
            Arc::clone(&running),
        );
    }

    join_update_watcher(watcher).await;
    info!("keybridge watch stopped");
    Ok(())
}
