// src/event.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a single filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    Create,
    Modify,
    Delete,
    Rename,
}

impl fmt::Display for RawEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RawEventKind::Create => "CREATE",
            RawEventKind::Modify => "MODIFY",
            RawEventKind::Delete => "DELETE",
            RawEventKind::Rename => "RENAME",
        };
        f.write_str(s)
    }
}

/// One filesystem change for one path, as produced by a notifier.
///
/// For `Rename` the path is the *old* location; the new location is reported
/// separately as a `Create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: RawEventKind,
}

impl RawEvent {
    pub fn new(kind: RawEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self::new(RawEventKind::Create, path)
    }

    pub fn modify(path: impl Into<PathBuf>) -> Self {
        Self::new(RawEventKind::Modify, path)
    }

    pub fn delete(path: impl Into<PathBuf>) -> Self {
        Self::new(RawEventKind::Delete, path)
    }

    pub fn rename(path: impl Into<PathBuf>) -> Self {
        Self::new(RawEventKind::Rename, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_create(&self) -> bool {
        self.kind == RawEventKind::Create
    }

    pub fn is_modify(&self) -> bool {
        self.kind == RawEventKind::Modify
    }

    pub fn is_delete(&self) -> bool {
        self.kind == RawEventKind::Delete
    }

    pub fn is_rename(&self) -> bool {
        self.kind == RawEventKind::Rename
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}
