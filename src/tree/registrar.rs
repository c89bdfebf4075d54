// src/tree/registrar.rs

//! Registration of single directories and whole trees with a notifier.
//!
//! Shared by the client-facing [`TreeWatcher`](super::TreeWatcher) and the
//! dispatch loop, which extends coverage when a new directory shows up.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::NotifierError;
use crate::fs::FileSystem;
use crate::notifier::Notifier;
use crate::walk::{walk_dirs, SkippedEntry, WalkErrorPolicy};

/// Outcome of a best-effort tree registration.
#[derive(Debug, Default)]
pub struct TreeRegistration {
    /// Directories the notifier accepted (including already registered ones).
    pub registered: Vec<PathBuf>,
    /// Directories the notifier refused.
    pub failed: Vec<(PathBuf, NotifierError)>,
    /// Directories the walk could not list.
    pub skipped: Vec<SkippedEntry>,
}

pub struct TreeRegistrar<N: Notifier> {
    notifier: Arc<N>,
    fs: Arc<dyn FileSystem>,
}

impl<N: Notifier> Clone for TreeRegistrar<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
            fs: Arc::clone(&self.fs),
        }
    }
}

impl<N: Notifier> fmt::Debug for TreeRegistrar<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeRegistrar")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl<N: Notifier> TreeRegistrar<N> {
    pub fn new(notifier: Arc<N>, fs: Arc<dyn FileSystem>) -> Self {
        Self { notifier, fs }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// True if `path` is a directory right now. A path that has already
    /// disappeared is simply not a directory.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.fs.is_dir(path)
    }

    /// True if `path` itself is a symbolic link.
    pub fn is_symlink(&self, path: &Path) -> bool {
        self.fs.is_symlink(path)
    }

    /// Register one path, no recursion.
    pub fn watch(&self, path: &Path) -> Result<(), NotifierError> {
        self.notifier.register(path)
    }

    /// Register `path` and every directory below it that exists now.
    ///
    /// Per-directory failures are logged and collected, never propagated.
    pub fn watch_tree(&self, path: &Path) -> TreeRegistration {
        let mut outcome = TreeRegistration::default();

        if let Err(err) = self.watch(path) {
            debug!(?path, %err, "failed to register tree root");
        }

        let report = walk_dirs(self.fs.as_ref(), path, WalkErrorPolicy::Continue);
        for dir in report.dirs {
            match self.watch(&dir) {
                Ok(()) => outcome.registered.push(dir),
                Err(err) => {
                    debug!(path = ?dir, %err, "skipping directory that could not be registered");
                    outcome.failed.push((dir, err));
                }
            }
        }

        for skipped in &report.skipped {
            warn!(path = ?skipped.path, error = %skipped.error, "could not read directory; its subdirectories are not watched");
        }
        outcome.skipped = report.skipped;

        debug!(
            root = ?path,
            registered = outcome.registered.len(),
            failed = outcome.failed.len(),
            skipped = outcome.skipped.len(),
            "tree registration finished"
        );
        outcome
    }
}
