// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by a [`Notifier`](crate::notifier::Notifier).
///
/// - `Init` is fatal to construction.
/// - `Register` is propagated by `watch` but swallowed by `watch_tree`.
/// - `Runtime` and `Overflow` arrive asynchronously on the error channel and
///   are never fatal to the dispatch loop.
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("failed to initialise notifier: {0}")]
    Init(#[source] notify::Error),

    #[error("failed to register {path:?}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("notifier runtime error: {0}")]
    Runtime(#[source] notify::Error),

    /// The OS event queue overflowed; some events were lost and the tree
    /// should be rescanned.
    #[error("notifier event queue overflowed, events were lost")]
    Overflow,

    #[error("notifier is closed")]
    Closed,
}

impl NotifierError {
    pub fn register(path: impl Into<PathBuf>, source: notify::Error) -> Self {
        NotifierError::Register {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum TreeWatchError {
    #[error(transparent)]
    Notifier(#[from] NotifierError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("tree watcher must be created inside a Tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TreeWatchError>;
