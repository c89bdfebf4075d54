#![allow(dead_code)]

//! Helpers for driving a real `TreeWatcher` against a temporary directory.
//!
//! Every helper performs one filesystem operation and then asserts on the
//! events it should produce, mirroring how a client would observe the tree.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use treewatch::{RawEvent, TreeWatcher};

pub use treewatch_test_utils::{init_tracing, with_timeout};

/// How long to wait for an expected event.
const EVENT_TIMEOUT: Duration = Duration::from_secs(2);
/// Quiet period used to decide that no further events are coming.
const SETTLE: Duration = Duration::from_millis(100);

pub struct Harness {
    pub watcher: TreeWatcher,
    pub root: PathBuf,
    _tmp: TempDir,
}

impl Harness {
    /// A watcher over a fresh, empty, fully watched temporary directory.
    pub fn new() -> Self {
        Self::with_tree(&[])
    }

    /// Like [`Harness::new`], but `dirs` (relative, nested allowed) exist
    /// before the tree is registered.
    pub fn with_tree(dirs: &[&str]) -> Self {
        let tmp = tempfile::Builder::new()
            .prefix("treewatch_test")
            .tempdir()
            .expect("create temp dir");
        let root = tmp.path().canonicalize().expect("canonicalize temp dir");
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).expect("create pre-existing dir");
        }
        let watcher = TreeWatcher::new().expect("create tree watcher");
        watcher.watch_tree(&root);
        Self {
            watcher,
            root,
            _tmp: tmp,
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Next event, or `None` after the timeout. Fails on notifier errors.
    pub async fn get_event(&mut self) -> Option<RawEvent> {
        if let Ok(err) = self.watcher.try_recv_error() {
            panic!("notifier returned error: {err}");
        }
        match tokio::time::timeout(EVENT_TIMEOUT, self.watcher.recv_event()).await {
            Ok(event) => {
                tracing::info!(?event, "got event");
                event
            }
            Err(_) => None,
        }
    }

    pub async fn expect_event(&mut self) -> RawEvent {
        self.get_event()
            .await
            .expect("expected an event but found none")
    }

    /// Wait for the tree to go quiet and fail on any event for a path that
    /// still exists. Events for vanished paths (e.g. the old side of a moved
    /// directory) are tolerated.
    pub async fn expect_no_event(&mut self) {
        tokio::time::sleep(SETTLE).await;
        loop {
            if let Ok(err) = self.watcher.try_recv_error() {
                panic!("notifier returned error: {err}");
            }
            match self.watcher.try_recv_event() {
                Ok(event) if event.path.exists() => panic!("got unexpected event {event}"),
                Ok(event) => tracing::info!(%event, "ignoring event for vanished path"),
                Err(_) => return,
            }
        }
    }

    /// Create or append to `rel`, asserting the matching Create/Modify events.
    pub async fn write_file(&mut self, rel: &str, data: &str) {
        let full = self.path(rel);
        let create = !full.exists();

        let mut file = if create {
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full)
                .expect("create file");
            let event = self.expect_event().await;
            assert!(
                event.is_create() && event.path == full,
                "expected create event on {full:?} but got {event}"
            );
            file
        } else {
            OpenOptions::new()
                .append(true)
                .open(&full)
                .expect("open file")
        };

        file.write_all(data.as_bytes()).expect("write file");
        file.sync_all().expect("sync file");
        drop(file);

        let event = self.expect_event().await;
        assert!(
            event.is_modify() && event.path == full,
            "expected modify event on {full:?} but got {event}"
        );

        self.expect_no_event().await;
    }

    pub async fn mkdir(&mut self, rel: &str) {
        let full = self.path(rel);
        fs::create_dir(&full).expect("mkdir");

        let event = self.expect_event().await;
        assert!(
            event.is_create() && event.path == full,
            "expected create event on {full:?} but got {event}"
        );

        self.expect_no_event().await;
    }

    pub async fn delete_file(&mut self, rel: &str) {
        let full = self.path(rel);
        fs::remove_file(&full).expect("remove file");

        let event = self.expect_event().await;
        assert!(
            event.is_delete() && event.path == full,
            "expected delete event on {full:?} but got {event}"
        );

        self.expect_no_event().await;
    }

    /// Rename within the tree. The pair must contain a Rename for the old
    /// path and a Create for the new one, in either order.
    pub async fn rename(&mut self, old: &str, new: &str) {
        let old = self.path(old);
        let new = self.path(new);
        fs::rename(&old, &new).expect("rename");

        let events = [self.expect_event().await, self.expect_event().await];
        assert_rename_pair(&events, &old, &new);

        self.expect_no_event().await;
    }
}

pub fn assert_rename_pair(events: &[RawEvent], old: &Path, new: &Path) {
    assert!(
        events.iter().any(|e| e.is_rename() && e.path == old),
        "expected rename event on {old:?} but got {events:?}"
    );
    assert!(
        events.iter().any(|e| e.is_create() && e.path == new),
        "expected create event on {new:?} but got {events:?}"
    );
}
