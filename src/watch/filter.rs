// src/watch/filter.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::Settings;
use crate::watch::path_utils::{is_hidden, relative_str};

/// Decides which paths under the watch folder are sources.
///
/// A path qualifies when it:
/// - lies under the watch folder,
/// - is not inside the output folder (when that differs from the watch
///   folder),
/// - has no dotfile component, unless hidden files are included,
/// - has one of the allowed extensions,
/// - matches none of the `exclude` globs (relative to the watch folder).
#[derive(Clone)]
pub struct WatchFilter {
    root: PathBuf,
    output_folder: PathBuf,
    include_hidden: bool,
    extensions: Vec<String>,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl WatchFilter {
    pub fn new(settings: &Settings) -> Result<Self> {
        let exclude = if settings.filters.exclude.is_empty() {
            None
        } else {
            Some(build_globset(&settings.filters.exclude).context("building exclude globset")?)
        };

        Ok(Self {
            root: settings.watch_folder.clone(),
            output_folder: settings.output_folder.clone(),
            include_hidden: settings.filters.include_hidden,
            extensions: settings
                .filters
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            exclude,
        })
    }

    /// Whether `path` is a source file the watch loop should act on.
    pub fn accepts_file(&self, path: &Path) -> bool {
        let Some(rel) = self.relative(path) else {
            return false;
        };
        if rel.is_empty() || !self.has_allowed_extension(path) {
            return false;
        }
        !self.is_excluded(&rel)
    }

    /// Whether the initial scan should walk into `dir`.
    pub fn descend_into(&self, dir: &Path) -> bool {
        match self.relative(dir) {
            Some(rel) if rel.is_empty() => true,
            Some(rel) => !self.is_excluded(&rel),
            None => false,
        }
    }

    fn relative(&self, path: &Path) -> Option<String> {
        if self.output_folder != self.root && path.starts_with(&self.output_folder) {
            return None;
        }
        relative_str(&self.root, path)
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|allowed| *allowed == e))
    }

    fn is_excluded(&self, rel: &str) -> bool {
        if !self.include_hidden && is_hidden(rel) {
            return true;
        }
        self.exclude
            .as_ref()
            .is_some_and(|set| set.is_match(rel))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
