// src/watch/event_handler.rs

//! Forwarding classified changes into the runtime.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::fs::FileSystem;
use crate::types::{ChangeEvent, ChangeKind};
use crate::watch::filter::WatchFilter;
use crate::watch::hash::ContentHashes;

/// Filter a coalesced batch of changes and send the survivors to the
/// runtime, in order.
///
/// - Paths the filter rejects are dropped.
/// - With `hashes`, a modification whose contents hash the same as last
///   time is skipped. Removals forget the stored hash.
///
/// Returns `false` once the runtime channel is closed, so the caller can
/// stop its loop.
pub async fn process_changes(
    changes: Vec<ChangeEvent>,
    filter: &WatchFilter,
    mut hashes: Option<&mut ContentHashes>,
    fs: &dyn FileSystem,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    for change in changes {
        if !filter.accepts_file(&change.path) {
            debug!(path = ?change.path, "ignored by watch filter");
            continue;
        }

        if let Some(hashes) = hashes.as_deref_mut() {
            match change.kind {
                ChangeKind::Removed => hashes.forget(&change.path),
                ChangeKind::Created | ChangeKind::Modified => {
                    if !hashes.has_changed(fs, &change.path) {
                        info!(path = ?change.path, "contents unchanged; skipping");
                        continue;
                    }
                }
            }
        }

        debug!(path = ?change.path, kind = %change.kind, "forwarding change");
        if let Err(err) = runtime_tx.send(RuntimeEvent::FileChanged(change)).await {
            warn!("failed to send RuntimeEvent::FileChanged: {err}");
            return false;
        }
    }
    true
}
