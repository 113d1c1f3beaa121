// src/watch/scan.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::filter::WatchFilter;

/// Enumerate every source file under `root` that passes `filter`.
///
/// Directories rejected by [`WatchFilter::descend_into`] are skipped whole.
/// Unreadable subdirectories are logged and skipped; only an unreadable
/// `root` is an error. The result is sorted.
pub fn scan_sources(fs: &dyn FileSystem, root: &Path, filter: &WatchFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    let mut first = true;

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if !first => {
                warn!(?dir, error = %err, "skipping unreadable directory");
                continue;
            }
            Err(err) => return Err(err),
        };
        first = false;

        for entry in entries {
            if fs.is_dir(&entry) {
                if filter.descend_into(&entry) {
                    stack.push(entry);
                }
            } else if fs.is_file(&entry) && filter.accepts_file(&entry) {
                files.push(entry);
            }
        }
    }

    files.sort();
    debug!(count = files.len(), ?root, "scanned sources");
    Ok(files)
}
