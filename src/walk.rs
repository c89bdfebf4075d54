// src/walk.rs

//! Directory traversal used when registering a tree.
//!
//! The walk is depth-first and visits every directory below (and including)
//! the root. What happens when an entry cannot be read is decided by an
//! explicit [`WalkErrorPolicy`] rather than by silently ignoring failures:
//! `watch_tree` uses [`WalkErrorPolicy::Continue`], which records the failure
//! in [`WalkReport::skipped`] and keeps going so that coverage is maximised.
//!
//! Symlinked directories below the root are not followed, which keeps the
//! walk finite in the presence of link cycles.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::fs::FileSystem;

/// What to do when a directory cannot be listed during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkErrorPolicy {
    /// Record the failure, skip that directory's contents, keep walking.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// A directory that could not be listed.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Result of a walk: every directory found, plus what was skipped.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Directories in visit order, root first.
    pub dirs: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
    /// True if the walk stopped early under [`WalkErrorPolicy::Abort`].
    pub aborted: bool,
}

impl WalkReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && !self.aborted
    }
}

/// Collect `root` and every directory beneath it.
///
/// If `root` is not a directory the report is empty.
pub fn walk_dirs(fs: &dyn FileSystem, root: &Path, policy: WalkErrorPolicy) -> WalkReport {
    let mut report = WalkReport::default();

    if !fs.is_dir(root) {
        return report;
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                trace!(path = ?dir, %error, "cannot list directory");
                // The directory itself exists, so it is still worth registering.
                report.dirs.push(dir.clone());
                report.skipped.push(SkippedEntry { path: dir, error });
                if policy == WalkErrorPolicy::Abort {
                    report.aborted = true;
                    return report;
                }
                continue;
            }
        };

        report.dirs.push(dir);

        // Reverse so that the first listed child is visited first.
        for entry in entries.into_iter().rev() {
            if fs.is_dir(&entry) && !fs.is_symlink(&entry) {
                stack.push(entry);
            }
        }
    }

    report
}
