// src/watch/hash.rs

//! Content hashing for `skip_unchanged`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Compute the blake3 hash of a single file, as lowercase hex.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs
        .read(path)
        .with_context(|| format!("reading file for hashing: {:?}", path))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize().to_hex().to_string())
}

/// Last known content hash per source, kept in memory for the lifetime of
/// the watcher.
#[derive(Debug, Default)]
pub struct ContentHashes {
    map: HashMap<PathBuf, String>,
}

impl ContentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current hash of every file in `paths`. Unreadable files
    /// are skipped; their first change will count as a real change.
    pub fn seed(&mut self, fs: &dyn FileSystem, paths: &[PathBuf]) {
        for path in paths {
            match compute_file_hash(fs, path) {
                Ok(hash) => {
                    self.map.insert(path.clone(), hash);
                }
                Err(err) => debug!(?path, error = %err, "could not seed hash"),
            }
        }
    }

    /// Returns `true` if `path`'s contents differ from the last recorded
    /// hash (or no hash was recorded), and records the new hash.
    ///
    /// A file that cannot be read is treated as changed.
    pub fn has_changed(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let new_hash = match compute_file_hash(fs, path) {
            Ok(h) => h,
            Err(err) => {
                warn!(?path, error = %err, "failed to hash file; treating as changed");
                return true;
            }
        };
        let changed = self.map.get(path) != Some(&new_hash);
        self.map.insert(path.to_path_buf(), new_hash);
        changed
    }

    pub fn forget(&mut self, path: &Path) {
        self.map.remove(path);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn unchanged_contents_are_detected() {
        let fs = MockFileSystem::new();
        let path = PathBuf::from("/p/src/a.less");
        fs.add_file(&path, "a { color: red; }");

        let mut hashes = ContentHashes::new();
        hashes.seed(&fs, std::slice::from_ref(&path));
        assert_eq!(hashes.len(), 1);

        assert!(!hashes.has_changed(&fs, &path));

        fs.add_file(&path, "a { color: blue; }");
        assert!(hashes.has_changed(&fs, &path));
        assert!(!hashes.has_changed(&fs, &path));
    }

    #[test]
    fn unknown_and_forgotten_files_count_as_changed() {
        let fs = MockFileSystem::new();
        let path = PathBuf::from("/p/src/b.less");
        fs.add_file(&path, "b {}");

        let mut hashes = ContentHashes::new();
        assert!(hashes.has_changed(&fs, &path));

        hashes.forget(&path);
        assert!(hashes.is_empty());
        assert!(hashes.has_changed(&fs, &path));
    }

    #[test]
    fn unreadable_file_counts_as_changed() {
        let fs = MockFileSystem::new();
        let mut hashes = ContentHashes::new();
        assert!(hashes.has_changed(&fs, Path::new("/p/src/missing.less")));
        assert!(hashes.is_empty());
    }
}
