// src/tree/mod.rs

//! Recursive tree watching on top of a flat, per-directory notifier.
//!
//! The [`TreeWatcher`] owns one notifier and one background dispatch loop.
//! Registration walks the tree synchronously on the caller's thread; the loop
//! extends coverage whenever a new directory appears and republishes every
//! raw event and error on two bounded channels.

mod dispatch;
pub mod registrar;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{validate_watcher_config, TreeWatcherConfig};
use crate::errors::{NotifierError, Result, TreeWatchError};
use crate::event::RawEvent;
use crate::fs::{FileSystem, RealFileSystem};
use crate::notifier::{Notifier, NotifierStreams, NotifyAdapter};

use dispatch::Dispatcher;
pub use registrar::{TreeRegistrar, TreeRegistration};

/// Watches whole directory trees and reports every change inside them.
///
/// Must be created inside a Tokio runtime. Dropping the watcher has the same
/// effect as [`TreeWatcher::close`].
pub struct TreeWatcher<N: Notifier = NotifyAdapter> {
    registrar: TreeRegistrar<N>,
    events: mpsc::Receiver<RawEvent>,
    errors: mpsc::Receiver<NotifierError>,
    shutdown: Option<oneshot::Sender<()>>,
    dispatch: Option<JoinHandle<()>>,
}

impl<N: Notifier> fmt::Debug for TreeWatcher<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeWatcher")
            .field("registrar", &self.registrar)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl TreeWatcher<NotifyAdapter> {
    /// Create a watcher over the platform notifier with default queue sizes.
    pub fn new() -> Result<Self> {
        Self::with_config(&TreeWatcherConfig::default())
    }

    pub fn with_config(config: &TreeWatcherConfig) -> Result<Self> {
        let (adapter, streams) = NotifyAdapter::new()?;
        Self::with_notifier(adapter, streams, Arc::new(RealFileSystem), config)
    }
}

impl<N: Notifier> TreeWatcher<N> {
    /// Build a watcher around an existing notifier and its output streams,
    /// and start the dispatch loop. No paths are registered yet.
    pub fn with_notifier(
        notifier: N,
        streams: NotifierStreams,
        fs: Arc<dyn FileSystem>,
        config: &TreeWatcherConfig,
    ) -> Result<Self> {
        validate_watcher_config(config)?;
        let runtime = Handle::try_current().map_err(|_| TreeWatchError::NoRuntime)?;

        let registrar = TreeRegistrar::new(Arc::new(notifier), fs);
        let (events_tx, events) = mpsc::channel(config.event_capacity);
        let (errors_tx, errors) = mpsc::channel(config.error_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let dispatcher = Dispatcher {
            registrar: registrar.clone(),
            inbound: streams,
            events_tx,
            errors_tx,
            shutdown: shutdown_rx,
        };
        let dispatch = runtime.spawn(dispatcher.run());

        debug!(
            event_capacity = config.event_capacity,
            error_capacity = config.error_capacity,
            "tree watcher created"
        );

        Ok(Self {
            registrar,
            events,
            errors,
            shutdown: Some(shutdown_tx),
            dispatch: Some(dispatch),
        })
    }

    /// Watch `path` and every directory beneath it.
    ///
    /// Best effort: directories that cannot be read or registered are
    /// skipped and logged; the rest of the tree is still covered.
    pub fn watch_tree(&self, path: impl AsRef<Path>) {
        self.registrar.watch_tree(path.as_ref());
    }

    /// Watch a single directory, without recursion.
    pub fn watch(&self, path: impl AsRef<Path>) -> std::result::Result<(), NotifierError> {
        self.registrar.watch(path.as_ref())
    }

    /// Stop the notifier, then stop the dispatch loop.
    ///
    /// Events already queued stay readable; nothing new is forwarded once the
    /// loop has seen the signal. Calling this again is a no-op.
    pub fn close(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };
        self.registrar.notifier().close();
        if shutdown.send(()).is_err() {
            debug!("dispatch loop already stopped");
        }
        debug!("tree watcher closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_none()
    }

    /// Wait until the dispatch loop has exited (after [`close`](Self::close),
    /// or because the notifier's streams ended).
    pub async fn wait_stopped(&mut self) {
        if let Some(handle) = self.dispatch.take() {
            if let Err(err) = handle.await {
                warn!(%err, "dispatch loop ended abnormally");
            }
        }
    }

    /// Next event, waiting if none is queued. `None` once the loop has
    /// stopped and the queue is drained.
    pub async fn recv_event(&mut self) -> Option<RawEvent> {
        self.events.recv().await
    }

    pub async fn recv_error(&mut self) -> Option<NotifierError> {
        self.errors.recv().await
    }

    pub fn try_recv_event(&mut self) -> std::result::Result<RawEvent, TryRecvError> {
        self.events.try_recv()
    }

    pub fn try_recv_error(&mut self) -> std::result::Result<NotifierError, TryRecvError> {
        self.errors.try_recv()
    }

    /// Both outbound channels at once, e.g. for use in `tokio::select!`.
    pub fn channels_mut(
        &mut self,
    ) -> (&mut mpsc::Receiver<RawEvent>, &mut mpsc::Receiver<NotifierError>) {
        (&mut self.events, &mut self.errors)
    }
}

impl<N: Notifier> Drop for TreeWatcher<N> {
    fn drop(&mut self) {
        self.close();
    }
}
