// src/lib.rs

//! Recursive directory-tree change notification.
//!
//! [`TreeWatcher`] turns a flat, per-directory notifier into one that covers
//! a whole tree, registering newly created directories before their creation
//! is reported so that nothing written inside them is missed.

pub mod cli;
pub mod config;
pub mod errors;
pub mod event;
pub mod fs;
pub mod logging;
pub mod notifier;
pub mod tree;
pub mod walk;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::load_or_default;

pub use crate::config::TreeWatcherConfig;
pub use crate::errors::{NotifierError, TreeWatchError};
pub use crate::event::{RawEvent, RawEventKind};
pub use crate::notifier::{Notifier, NotifierStreams, NotifyAdapter};
pub use crate::tree::TreeWatcher;
pub use notify;

/// High-level entry point used by `main.rs`.
///
/// Watches `args.root`, prints one line per event to stdout and notifier
/// errors to stderr, until Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let watcher_cfg = match args.capacity {
        Some(n) => TreeWatcherConfig::with_capacity(n),
        None => cfg.watcher,
    };

    let root = resolve_root(&args.root);
    let mut watcher = TreeWatcher::with_config(&watcher_cfg)?;
    watcher.watch_tree(&root);
    info!(?root, "watching tree");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let (events, errors) = watcher.channels_mut();
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                }
                break;
            }
            Some(event) = events.recv() => println!("{event}"),
            Some(err) = errors.recv() => eprintln!("treewatch: {err}"),
            else => break,
        }
    }

    watcher.close();
    info!("stopped");
    Ok(())
}

/// Canonicalize once so reported paths share a stable prefix; fall back to
/// the path as given if that fails.
fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}
