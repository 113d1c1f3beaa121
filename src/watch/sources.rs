// src/watch/sources.rs

//! Directory-aware bookkeeping of the sources currently under the watch
//! folder.
//!
//! Backends report a moved or renamed directory as a single path. This
//! module turns such events into one change per source file: a directory
//! that appears is walked, and a directory that disappears is expanded from
//! the set of sources known to live under it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::types::{ChangeEvent, ChangeKind};
use crate::watch::filter::WatchFilter;
use crate::watch::scan::scan_sources;

#[derive(Debug, Default)]
pub struct KnownSources {
    paths: BTreeSet<PathBuf>,
}

impl KnownSources {
    /// Start from the result of the initial scan.
    pub fn new(seed: &[PathBuf]) -> Self {
        Self {
            paths: seed.iter().cloned().collect(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Replace directory-level changes with per-file changes and keep the
    /// known set in step with what is forwarded.
    ///
    /// - A created directory yields `Created` for every source found in it.
    /// - A removed path yields `Removed` for every known source under it
    ///   (itself included), or passes through unchanged when none is known.
    /// - Modifications of a directory carry no content change and are
    ///   dropped.
    pub fn expand(
        &mut self,
        changes: Vec<ChangeEvent>,
        fs: &dyn FileSystem,
        filter: &WatchFilter,
    ) -> Vec<ChangeEvent> {
        let mut out = Vec::with_capacity(changes.len());

        for change in changes {
            match change.kind {
                ChangeKind::Removed => {
                    let under: Vec<PathBuf> = self
                        .paths
                        .iter()
                        .filter(|known| known.starts_with(&change.path))
                        .cloned()
                        .collect();
                    if under.is_empty() {
                        out.push(change);
                    } else {
                        debug!(path = ?change.path, sources = under.len(), "expanded removal");
                        out.extend(under.into_iter().map(ChangeEvent::removed));
                    }
                }
                ChangeKind::Created if fs.is_dir(&change.path) => {
                    if !filter.descend_into(&change.path) {
                        continue;
                    }
                    match scan_sources(fs, &change.path, filter) {
                        Ok(files) => {
                            debug!(path = ?change.path, sources = files.len(), "expanded new directory");
                            out.extend(files.into_iter().map(ChangeEvent::created));
                        }
                        Err(err) => {
                            warn!(path = ?change.path, error = %err, "could not walk new directory");
                        }
                    }
                }
                ChangeKind::Modified if fs.is_dir(&change.path) => {}
                ChangeKind::Created | ChangeKind::Modified => out.push(change),
            }
        }

        for change in &out {
            if !filter.accepts_file(&change.path) {
                continue;
            }
            match change.kind {
                ChangeKind::Removed => {
                    self.paths.remove(&change.path);
                }
                ChangeKind::Created | ChangeKind::Modified => {
                    self.paths.insert(change.path.clone());
                }
            }
        }

        out
    }
}
