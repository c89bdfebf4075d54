// src/notifier/adapter.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

use crate::errors::NotifierError;
use crate::fs::RealFileSystem;
use crate::notifier::{notifier_channel, raw_events, Notifier, NotifierSinks, NotifierStreams};

/// [`Notifier`] backed by the platform's recommended `notify` watcher, used
/// strictly non-recursively.
///
/// Keeps the set of registered directories so that re-registration is a
/// no-op. A directory is forgotten as soon as a delete or rename of it (or of
/// an ancestor) is observed, so the same path can be registered again once it
/// reappears.
pub struct NotifyAdapter {
    inner: Mutex<Option<RecommendedWatcher>>,
    registered: Arc<Mutex<HashSet<PathBuf>>>,
}

impl std::fmt::Debug for NotifyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyAdapter")
            .field("registered", &lock(&self.registered).len())
            .finish_non_exhaustive()
    }
}

impl NotifyAdapter {
    pub fn new() -> Result<(Self, NotifierStreams), NotifierError> {
        Self::with_notify_config(Config::default())
    }

    pub fn with_notify_config(config: Config) -> Result<(Self, NotifierStreams), NotifierError> {
        let (sinks, streams) = notifier_channel();
        let registered = Arc::new(Mutex::new(HashSet::new()));

        // Called synchronously on notify's own thread.
        let handler = {
            let registered = Arc::clone(&registered);
            move |res: notify::Result<Event>| handle_notify_result(res, &sinks, &registered)
        };

        let watcher = RecommendedWatcher::new(handler, config).map_err(NotifierError::Init)?;

        Ok((
            Self {
                inner: Mutex::new(Some(watcher)),
                registered,
            },
            streams,
        ))
    }

    /// True if `path` is currently registered.
    pub fn is_registered(&self, path: &Path) -> bool {
        lock(&self.registered).contains(path)
    }
}

impl Notifier for NotifyAdapter {
    fn register(&self, path: &Path) -> Result<(), NotifierError> {
        let mut inner = lock(&self.inner);
        let watcher = inner.as_mut().ok_or(NotifierError::Closed)?;

        if lock(&self.registered).contains(path) {
            trace!(?path, "already registered");
            return Ok(());
        }

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| NotifierError::register(path, e))?;

        lock(&self.registered).insert(path.to_path_buf());
        debug!(?path, "registered directory");
        Ok(())
    }

    fn close(&self) {
        if lock(&self.inner).take().is_some() {
            lock(&self.registered).clear();
            debug!("notifier closed");
        } else {
            warn!("notifier already closed");
        }
    }
}

/// Route one callback result from `notify` onto the raw streams.
fn handle_notify_result(
    res: notify::Result<Event>,
    sinks: &NotifierSinks,
    registered: &Mutex<HashSet<PathBuf>>,
) {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            if sinks.errors.send(NotifierError::Runtime(err)).is_err() {
                trace!("raw error receiver dropped");
            }
            return;
        }
    };

    // inotify reports a queue overflow as an event flagged for rescan.
    if event.need_rescan() {
        warn!("notifier queue overflowed");
        if sinks.errors.send(NotifierError::Overflow).is_err() {
            trace!("raw error receiver dropped");
        }
    }

    for raw in raw_events(event, &RealFileSystem) {
        if raw.is_delete() || raw.is_rename() {
            forget_subtree(registered, &raw.path);
        }
        if sinks.events.send(raw).is_err() {
            trace!("raw event receiver dropped");
            return;
        }
    }
}

fn forget_subtree(registered: &Mutex<HashSet<PathBuf>>, path: &Path) {
    let mut set = lock(registered);
    let before = set.len();
    set.retain(|p| !p.starts_with(path));
    if set.len() != before {
        trace!(?path, removed = before - set.len(), "forgot registrations");
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
