#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use stylewatch::config::Settings;

/// Builder for `Settings` to simplify test setup.
///
/// Paths are taken verbatim, so tests against `MockFileSystem` should use
/// absolute, normalized paths.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new(watch_folder: impl Into<PathBuf>, output_folder: impl Into<PathBuf>) -> Self {
        let mut settings = Settings::new(watch_folder, output_folder);
        settings.debounce = Duration::ZERO;
        Self { settings }
    }

    /// Pin a main file, relative to the watch folder.
    pub fn main_file(mut self, relative: &str) -> Self {
        self.settings.main_file = Some(self.settings.watch_folder.join(relative));
        self
    }

    pub fn source_map(mut self, val: bool) -> Self {
        self.settings.compile.source_map = val;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
