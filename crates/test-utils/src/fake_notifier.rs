use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use treewatch::notifier::{notifier_channel, NotifierSinks, NotifierStreams};
use treewatch::{notify, Notifier, NotifierError, RawEvent};

#[derive(Debug, Default)]
struct FakeState {
    registrations: Vec<PathBuf>,
    refuse: HashSet<PathBuf>,
    close_calls: usize,
}

/// A notifier that:
/// - records every `register` call in order
/// - refuses paths it has been told to refuse
/// - lets the test push raw events/errors as if the OS had produced them.
///
/// Clones share state, so a test can hand one clone to the watcher and keep
/// another for inspection.
#[derive(Debug, Clone)]
pub struct FakeNotifier {
    state: Arc<Mutex<FakeState>>,
    sinks: NotifierSinks,
}

impl FakeNotifier {
    pub fn new() -> (Self, NotifierStreams) {
        let (sinks, streams) = notifier_channel();
        let fake = Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            sinks,
        };
        (fake, streams)
    }

    /// Make future `register(path)` calls fail.
    pub fn refuse(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().refuse.insert(path.into());
    }

    pub fn registrations(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().registrations.clone()
    }

    pub fn is_registered(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.state
            .lock()
            .unwrap()
            .registrations
            .iter()
            .any(|p| p == path)
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    /// Deliver a raw event. Delivery ignores `close()`, so tests can check
    /// that a closed watcher forwards nothing even if the notifier misbehaves.
    pub fn emit(&self, event: RawEvent) {
        let _ = self.sinks.events.send(event);
    }

    pub fn emit_error(&self, err: NotifierError) {
        let _ = self.sinks.errors.send(err);
    }
}

impl Notifier for FakeNotifier {
    fn register(&self, path: &Path) -> Result<(), NotifierError> {
        let mut state = self.state.lock().unwrap();
        state.registrations.push(path.to_path_buf());
        if state.refuse.contains(path) {
            return Err(NotifierError::register(
                path,
                notify::Error::generic("refused by FakeNotifier"),
            ));
        }
        Ok(())
    }

    fn close(&self) {
        self.state.lock().unwrap().close_calls += 1;
    }
}
