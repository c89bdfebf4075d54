// src/notifier/mod.rs

//! The per-directory notification primitive the tree watcher builds on.
//!
//! A notifier watches single directories, non-recursively, and reports raw
//! events and errors on two asynchronous streams. It owns the set of
//! registered directories; callers can only append to it.

pub mod adapter;
pub mod convert;

use std::path::Path;

use tokio::sync::mpsc;

use crate::errors::NotifierError;
use crate::event::RawEvent;

pub use adapter::NotifyAdapter;
pub use convert::raw_events;

/// Flat, explicit, per-directory registration.
pub trait Notifier: Send + Sync + 'static {
    /// Start reporting changes to the immediate children of `path`.
    ///
    /// Registering an already registered path must not fail.
    fn register(&self, path: &Path) -> Result<(), NotifierError>;

    /// Stop all monitoring. Events already in flight may be dropped.
    fn close(&self);
}

/// Output side of a notifier: raw events and raw errors.
#[derive(Debug)]
pub struct NotifierStreams {
    pub events: mpsc::UnboundedReceiver<RawEvent>,
    pub errors: mpsc::UnboundedReceiver<NotifierError>,
}

/// Sending halves matching a [`NotifierStreams`].
#[derive(Debug, Clone)]
pub struct NotifierSinks {
    pub events: mpsc::UnboundedSender<RawEvent>,
    pub errors: mpsc::UnboundedSender<NotifierError>,
}

/// Create a connected sink/stream pair.
pub fn notifier_channel() -> (NotifierSinks, NotifierStreams) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    (
        NotifierSinks {
            events: event_tx,
            errors: error_tx,
        },
        NotifierStreams {
            events: event_rx,
            errors: error_rx,
        },
    )
}
