// src/notifier/convert.rs

//! Normalisation of `notify` events into [`RawEvent`]s.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::trace;

use crate::event::{RawEvent, RawEventKind};
use crate::fs::FileSystem;

/// Map one `notify::Event` to zero or more raw events, one per path.
///
/// A rename arrives as a `Rename` for the old path and a `Create` for the new
/// one, so that a directory moved into a watched tree is treated like any
/// other newly created directory. `RenameMode::Both` is dropped because the
/// backends that emit it also emit the `From`/`To` halves.
pub fn raw_events(event: Event, fs: &dyn FileSystem) -> Vec<RawEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => Some(RawEventKind::Create),
        EventKind::Remove(_) => Some(RawEventKind::Delete),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => Some(RawEventKind::Rename),
            RenameMode::To => Some(RawEventKind::Create),
            RenameMode::Any => None,
            RenameMode::Both | RenameMode::Other => {
                trace!(?event, "dropping rename event with both or unknown sides");
                return Vec::new();
            }
        },
        EventKind::Modify(_) => Some(RawEventKind::Modify),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => {
            trace!(?event, "ignoring event kind");
            return Vec::new();
        }
    };

    event
        .paths
        .into_iter()
        .map(|path| {
            // Ambiguous renames (e.g. FSEvents): the side that still exists is
            // the destination.
            let kind = kind.unwrap_or_else(|| {
                if fs.exists(&path) {
                    RawEventKind::Create
                } else {
                    RawEventKind::Rename
                }
            });
            RawEvent::new(kind, path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
    }

    #[test]
    fn create_remove_and_data_changes_map_directly() {
        let fs = MockFileSystem::new();

        let out = raw_events(event(EventKind::Create(CreateKind::Folder), &["/t/dir"]), &fs);
        assert_eq!(out, vec![RawEvent::create("/t/dir")]);

        let out = raw_events(event(EventKind::Remove(RemoveKind::File), &["/t/a"]), &fs);
        assert_eq!(out, vec![RawEvent::delete("/t/a")]);

        let out = raw_events(
            event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), &["/t/a"]),
            &fs,
        );
        assert_eq!(out, vec![RawEvent::modify("/t/a")]);

        let out = raw_events(
            event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), &["/t/a"]),
            &fs,
        );
        assert_eq!(out, vec![RawEvent::modify("/t/a")]);
    }

    #[test]
    fn rename_halves_become_rename_and_create() {
        let fs = MockFileSystem::new();

        let out = raw_events(
            event(EventKind::Modify(ModifyKind::Name(RenameMode::From)), &["/t/old"]),
            &fs,
        );
        assert_eq!(out, vec![RawEvent::rename("/t/old")]);

        let out = raw_events(
            event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), &["/t/new"]),
            &fs,
        );
        assert_eq!(out, vec![RawEvent::create("/t/new")]);
    }

    #[test]
    fn paired_rename_is_dropped() {
        let fs = MockFileSystem::new();
        let out = raw_events(
            event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/t/old", "/t/new"],
            ),
            &fs,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn ambiguous_rename_is_resolved_by_existence() {
        let fs = MockFileSystem::new();
        fs.add_file("/t/new");

        let out = raw_events(
            event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Any)),
                &["/t/old", "/t/new"],
            ),
            &fs,
        );
        assert_eq!(out, vec![RawEvent::rename("/t/old"), RawEvent::create("/t/new")]);
    }

    #[test]
    fn access_events_are_ignored() {
        let fs = MockFileSystem::new();
        let out = raw_events(event(EventKind::Access(AccessKind::Any), &["/t/a"]), &fs);
        assert!(out.is_empty());
    }
}
