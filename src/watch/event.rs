// src/watch/event.rs

//! Turning raw `notify` events into [`ChangeEvent`]s.
//!
//! Every backend event is classified exactly once, here, into created /
//! modified / removed. Anything that is not a content change (access,
//! permission or ownership updates) is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use notify::event::{EventKind, MetadataKind, ModifyKind, RenameMode};
use notify::Event;

use crate::fs::FileSystem;
use crate::types::{ChangeEvent, ChangeKind};

/// Classify one backend event into zero or more changes.
///
/// Directory paths are reported like files; [`super::sources::KnownSources`]
/// expands them into per-file changes.
pub fn classify(event: &Event, fs: &dyn FileSystem) -> Vec<ChangeEvent> {
    let by_existence = |path: &Path| {
        if fs.exists(path) {
            ChangeKind::Modified
        } else {
            ChangeKind::Removed
        }
    };

    let mut out = Vec::new();
    match &event.kind {
        EventKind::Create(_) => {
            for path in &event.paths {
                out.push(ChangeEvent::created(path));
            }
        }
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => {
                for path in &event.paths {
                    out.push(ChangeEvent::removed(path));
                }
            }
            RenameMode::To => {
                for path in &event.paths {
                    out.push(ChangeEvent::created(path));
                }
            }
            RenameMode::Both => {
                let mut paths = event.paths.iter();
                if let Some(from) = paths.next() {
                    out.push(ChangeEvent::removed(from));
                }
                for to in paths {
                    out.push(ChangeEvent::created(to));
                }
            }
            RenameMode::Any | RenameMode::Other => {
                for path in &event.paths {
                    let kind = if fs.exists(path) {
                        ChangeKind::Created
                    } else {
                        ChangeKind::Removed
                    };
                    out.push(ChangeEvent::new(kind, path));
                }
            }
        },
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)) => {
            for path in &event.paths {
                out.push(ChangeEvent::modified(path));
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => {}
        EventKind::Modify(_) | EventKind::Remove(_) => {
            // Editors that save via replace emit a remove for a path that
            // exists again by the time we look.
            for path in &event.paths {
                out.push(ChangeEvent::new(by_existence(path), path));
            }
        }
        EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
    }

    out
}

/// Merge a burst of changes so each path appears once, in order of first
/// appearance.
///
/// - created then modified stays created
/// - anything then removed is removed
/// - removed then created or modified is modified (the file was replaced)
/// - modified then created stays modified
pub fn coalesce(changes: Vec<ChangeEvent>) -> Vec<ChangeEvent> {
    let mut order: Vec<PathBuf> = Vec::new();
    let mut kinds: HashMap<PathBuf, ChangeKind> = HashMap::new();

    for change in changes {
        match kinds.get_mut(&change.path) {
            Some(kind) => *kind = merge(*kind, change.kind),
            None => {
                order.push(change.path.clone());
                kinds.insert(change.path, change.kind);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|path| kinds.remove(&path).map(|kind| ChangeEvent::new(kind, path)))
        .collect()
}

fn merge(earlier: ChangeKind, later: ChangeKind) -> ChangeKind {
    use ChangeKind::*;
    match (earlier, later) {
        (_, Removed) => Removed,
        (Removed, _) => Modified,
        (Created, _) => Created,
        (Modified, _) => Modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut ev = Event::new(kind);
        for p in paths {
            ev = ev.add_path(PathBuf::from(p));
        }
        ev
    }

    #[test]
    fn create_and_data_modify() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.less", "");

        let created = classify(&event(EventKind::Create(CreateKind::File), &["/p/a.less"]), &fs);
        assert_eq!(created, vec![ChangeEvent::created("/p/a.less")]);

        let modified = classify(
            &event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), &["/p/a.less"]),
            &fs,
        );
        assert_eq!(modified, vec![ChangeEvent::modified("/p/a.less")]);
    }

    #[test]
    fn rename_both_is_removal_then_creation() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/new.less", "");
        let changes = classify(
            &event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/p/old.less", "/p/new.less"],
            ),
            &fs,
        );
        assert_eq!(
            changes,
            vec![ChangeEvent::removed("/p/old.less"), ChangeEvent::created("/p/new.less")]
        );
    }

    #[test]
    fn remove_of_a_file_that_exists_again_is_a_modification() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.less", "");
        let changes = classify(&event(EventKind::Remove(RemoveKind::File), &["/p/a.less", "/p/gone.less"]), &fs);
        assert_eq!(
            changes,
            vec![ChangeEvent::modified("/p/a.less"), ChangeEvent::removed("/p/gone.less")]
        );
    }

    #[test]
    fn access_and_permission_changes_are_ignored() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.less", "");
        assert!(classify(&event(EventKind::Access(AccessKind::Any), &["/p/a.less"]), &fs).is_empty());
        assert!(
            classify(
                &event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)), &["/p/a.less"]),
                &fs
            )
            .is_empty()
        );
        assert_eq!(
            classify(
                &event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)), &["/p/a.less"]),
                &fs
            ),
            vec![ChangeEvent::modified("/p/a.less")]
        );
    }

    #[test]
    fn directory_moves_are_reported_by_path() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/dir2/a.less", "");
        let changes = classify(
            &event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/p/dir", "/p/dir2"],
            ),
            &fs,
        );
        assert_eq!(
            changes,
            vec![ChangeEvent::removed("/p/dir"), ChangeEvent::created("/p/dir2")]
        );
    }

    #[test]
    fn coalesce_merges_per_path_in_first_seen_order() {
        let merged = coalesce(vec![
            ChangeEvent::created("/p/b.less"),
            ChangeEvent::modified("/p/a.less"),
            ChangeEvent::modified("/p/b.less"),
            ChangeEvent::removed("/p/c.less"),
            ChangeEvent::created("/p/c.less"),
            ChangeEvent::modified("/p/a.less"),
            ChangeEvent::removed("/p/a.less"),
        ]);
        assert_eq!(
            merged,
            vec![
                ChangeEvent::created("/p/b.less"),
                ChangeEvent::removed("/p/a.less"),
                ChangeEvent::modified("/p/c.less"),
            ]
        );
    }
}
