// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default source extension (also the extension appended to bare imports).
pub const DEFAULT_SOURCE_EXTENSION: &str = "less";

/// Default extension of compiled output files.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "css";

/// Default compiler command.
pub const DEFAULT_COMPILER: &str = "lessc";

/// Default coalescing window for raw notifications.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Configuration as read from a TOML file (and as produced from CLI flags).
///
/// Every field is optional so that layers can be deep-merged: in-code
/// defaults, then the config file, then the command line.
///
/// ```toml
/// watch_folder = "less"
/// output_folder = "css"
/// main_file = "main.less"
/// exclude = ["vendor/**"]
///
/// [compile]
/// source_map = true
/// plugins = ["clean-css"]
/// args = { math = "strict" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub watch_folder: Option<String>,

    #[serde(default)]
    pub output_folder: Option<String>,

    /// Relative to `watch_folder`.
    #[serde(default)]
    pub main_file: Option<String>,

    #[serde(default)]
    pub run_once: Option<bool>,

    /// Also watch dotfiles and dot-directories.
    #[serde(default)]
    pub include_hidden: Option<bool>,

    /// Source extensions (without the dot). The first one is the default
    /// extension for bare import references.
    #[serde(default)]
    pub allowed_extensions: Option<Vec<String>>,

    #[serde(default)]
    pub output_extension: Option<String>,

    /// Glob patterns, relative to `watch_folder`, that are never compiled.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// Drop modification events whose file content did not change.
    #[serde(default)]
    pub skip_unchanged: Option<bool>,

    #[serde(default)]
    pub debounce_ms: Option<u64>,

    #[serde(default)]
    pub compile: RawCompileOptions,
}

/// `[compile]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCompileOptions {
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub enable_js: Option<bool>,

    #[serde(default)]
    pub source_map: Option<bool>,

    #[serde(default)]
    pub plugins: Option<Vec<String>>,

    /// Extra `--key=value` compiler arguments. Merged key by key.
    #[serde(default)]
    pub args: BTreeMap<String, String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Options bundle handed unmodified to the compile adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub command: String,
    pub enable_js: bool,
    pub source_map: bool,
    pub plugins: Vec<String>,
    pub args: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMPILER.to_string(),
            enable_js: false,
            source_map: false,
            plugins: Vec::new(),
            args: BTreeMap::new(),
            timeout: None,
        }
    }
}

/// Which paths qualify as sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    pub include_hidden: bool,
    pub allowed_extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            include_hidden: false,
            allowed_extensions: vec![DEFAULT_SOURCE_EXTENSION.to_string()],
            exclude: Vec::new(),
        }
    }
}

/// Fully resolved, immutable configuration for one run.
///
/// Built once by [`crate::config::resolve_settings`] and shared as
/// `Arc<Settings>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub watch_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Absolute path of the pinned main file, if any.
    pub main_file: Option<PathBuf>,
    pub run_once: bool,
    pub output_extension: String,
    pub filters: FilterSettings,
    pub compile: CompileOptions,
    pub skip_unchanged: bool,
    pub debounce: Duration,
}

impl Settings {
    /// Settings with defaults for everything but the two folders.
    pub fn new(watch_folder: impl Into<PathBuf>, output_folder: impl Into<PathBuf>) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            output_folder: output_folder.into(),
            main_file: None,
            run_once: false,
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            filters: FilterSettings::default(),
            compile: CompileOptions::default(),
            skip_unchanged: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Extension appended to import references that have none.
    pub fn default_extension(&self) -> &str {
        self.filters
            .allowed_extensions
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_SOURCE_EXTENSION)
    }

    pub fn main_file(&self) -> Option<&Path> {
        self.main_file.as_deref()
    }

    pub fn is_main_mode(&self) -> bool {
        self.main_file.is_some()
    }
}
