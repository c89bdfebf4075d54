// src/tree/dispatch.rs

//! The dispatch loop: a single task multiplexing raw events, raw errors and
//! the shutdown signal.
//!
//! Raw events and raw errors are taken in no fixed priority; shutdown is
//! checked before every step.
//!
//! A `Create` for a directory is registered (recursively) *before* it is
//! forwarded, so anything written inside the new directory after the client
//! sees the event is guaranteed to be reported.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::errors::NotifierError;
use crate::event::RawEvent;
use crate::notifier::{Notifier, NotifierStreams};

use super::registrar::{TreeRegistrar, TreeRegistration};

/// Whether the loop keeps running after handling one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub(crate) struct Dispatcher<N: Notifier> {
    pub(crate) registrar: TreeRegistrar<N>,
    pub(crate) inbound: NotifierStreams,
    pub(crate) events_tx: mpsc::Sender<RawEvent>,
    pub(crate) errors_tx: mpsc::Sender<NotifierError>,
    pub(crate) shutdown: oneshot::Receiver<()>,
}

impl<N: Notifier> Dispatcher<N> {
    pub(crate) async fn run(self) {
        let Dispatcher {
            registrar,
            mut inbound,
            events_tx,
            errors_tx,
            mut shutdown,
        } = self;

        debug!("dispatch loop started");

        loop {
            // Shutdown wins over any input that is already queued.
            if shutdown_requested(&mut shutdown) {
                debug!("shutdown signalled");
                break;
            }

            // Unbiased: a steady stream of events must not starve errors.
            let flow = tokio::select! {
                _ = &mut shutdown => {
                    debug!("shutdown signalled");
                    Flow::Stop
                }

                maybe_event = inbound.events.recv() => match maybe_event {
                    Some(event) => {
                        extend_coverage(&registrar, &event).await;
                        forward(&events_tx, event, &mut shutdown).await
                    }
                    None => {
                        debug!("raw event stream closed");
                        Flow::Stop
                    }
                },

                maybe_err = inbound.errors.recv() => match maybe_err {
                    Some(err) => {
                        debug!(%err, "forwarding notifier error");
                        forward(&errors_tx, err, &mut shutdown).await
                    }
                    None => {
                        debug!("raw error stream closed");
                        Flow::Stop
                    }
                },
            };

            if flow == Flow::Stop {
                break;
            }
        }

        debug!("dispatch loop stopped");
    }
}

fn shutdown_requested(shutdown: &mut oneshot::Receiver<()>) -> bool {
    !matches!(shutdown.try_recv(), Err(oneshot::error::TryRecvError::Empty))
}

/// What a newly created path needs before its event can be forwarded.
enum Coverage {
    /// Not a directory, or already gone.
    Nothing,
    /// A symlink to a directory: watched as a single path, never descended
    /// into, so the target tree stays outside the watch set.
    Link(Result<(), NotifierError>),
    Tree(TreeRegistration),
}

/// If `event` created a directory, watch the whole new subtree.
async fn extend_coverage<N: Notifier>(registrar: &TreeRegistrar<N>, event: &RawEvent) {
    if !event.is_create() {
        return;
    }

    let registrar = registrar.clone();
    let path = event.path.clone();
    let walk = tokio::task::spawn_blocking(move || {
        if !registrar.is_dir(&path) {
            Coverage::Nothing
        } else if registrar.is_symlink(&path) {
            Coverage::Link(registrar.watch(&path))
        } else {
            Coverage::Tree(registrar.watch_tree(&path))
        }
    });

    match walk.await {
        Ok(Coverage::Tree(outcome)) => {
            trace!(path = ?event.path, registered = outcome.registered.len(), "extended coverage to new directory");
        }
        Ok(Coverage::Link(Ok(()))) => trace!(path = ?event.path, "watching new directory link"),
        Ok(Coverage::Link(Err(err))) => debug!(path = ?event.path, %err, "could not watch new directory link"),
        Ok(Coverage::Nothing) => {}
        Err(err) => warn!(path = ?event.path, %err, "tree registration task failed"),
    }
}

/// Blocking hand-off to the client. Waits while the queue is full, but gives
/// up as soon as shutdown is signalled.
async fn forward<T>(tx: &mpsc::Sender<T>, item: T, shutdown: &mut oneshot::Receiver<()>) -> Flow {
    tokio::select! {
        biased;

        _ = shutdown => {
            debug!("shutdown signalled while forwarding");
            Flow::Stop
        }

        res = tx.send(item) => match res {
            Ok(()) => Flow::Continue,
            Err(_) => {
                debug!("outbound receiver dropped");
                Flow::Stop
            }
        },
    }
}
