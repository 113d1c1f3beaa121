// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use globset::Glob;

use crate::config::model::{
    CompileOptions, FilterSettings, RawConfig, Settings, DEFAULT_COMPILER,
    DEFAULT_DEBOUNCE_MS, DEFAULT_OUTPUT_EXTENSION, DEFAULT_SOURCE_EXTENSION,
};
use crate::errors::{Result, StylewatchError};
use crate::fs::FileSystem;
use crate::graph::resolve::normalize;

/// Turn a merged config layer into immutable [`Settings`].
///
/// This is the only place that touches the disk during startup validation:
/// the watch folder must exist (it is canonicalized) and a configured main
/// file must exist. The output folder is only made absolute; it is created
/// on the first write.
pub fn resolve_settings(raw: RawConfig, cwd: &Path, fs: &dyn FileSystem) -> Result<Settings> {
    let (Some(watch), Some(output)) = (raw.watch_folder.as_deref(), raw.output_folder.as_deref())
    else {
        return Err(StylewatchError::MissingFolders);
    };

    let watch_abs = normalize(&cwd.join(watch));
    if !fs.is_dir(&watch_abs) {
        return Err(StylewatchError::WatchFolderNotFound(watch_abs));
    }
    let watch_folder = fs
        .canonicalize(&watch_abs)
        .map_err(|_| StylewatchError::WatchFolderNotFound(watch_abs.clone()))?;

    let output_folder = normalize(&cwd.join(output));

    let main_file = match raw.main_file.as_deref() {
        Some(main) => Some(resolve_main_file(fs, &watch_folder, main)?),
        None => None,
    };

    let allowed_extensions = match raw.allowed_extensions {
        Some(list) => list.iter().map(|e| clean_extension(e)).collect::<Vec<_>>(),
        None => vec![DEFAULT_SOURCE_EXTENSION.to_string()],
    };
    if allowed_extensions.is_empty() || allowed_extensions.iter().any(String::is_empty) {
        return Err(StylewatchError::ConfigError(
            "allowed_extensions must contain at least one non-empty extension".to_string(),
        ));
    }

    let output_extension = clean_extension(
        raw.output_extension
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_EXTENSION),
    );
    if output_extension.is_empty() {
        return Err(StylewatchError::ConfigError(
            "output_extension must not be empty".to_string(),
        ));
    }

    let exclude = raw.exclude.unwrap_or_default();
    for pattern in &exclude {
        Glob::new(pattern).map_err(|e| {
            StylewatchError::ConfigError(format!("invalid exclude pattern '{pattern}': {e}"))
        })?;
    }

    let compile = raw.compile;
    if compile.timeout_secs == Some(0) {
        return Err(StylewatchError::ConfigError(
            "compile.timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    let command = compile
        .command
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COMPILER.to_string());

    Ok(Settings {
        watch_folder,
        output_folder,
        main_file,
        run_once: raw.run_once.unwrap_or(false),
        output_extension,
        filters: FilterSettings {
            include_hidden: raw.include_hidden.unwrap_or(false),
            allowed_extensions,
            exclude,
        },
        compile: CompileOptions {
            command,
            enable_js: compile.enable_js.unwrap_or(false),
            source_map: compile.source_map.unwrap_or(false),
            plugins: compile.plugins.unwrap_or_default(),
            args: compile.args,
            timeout: compile.timeout_secs.map(Duration::from_secs),
        },
        skip_unchanged: raw.skip_unchanged.unwrap_or(false),
        debounce: Duration::from_millis(raw.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
    })
}

fn resolve_main_file(fs: &dyn FileSystem, watch_folder: &Path, main: &str) -> Result<PathBuf> {
    let path = normalize(&watch_folder.join(main));
    if !fs.is_file(&path) {
        return Err(StylewatchError::MainFileMissing(path));
    }
    Ok(path)
}

fn clean_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn raw(watch: &str, output: &str) -> RawConfig {
        RawConfig {
            watch_folder: Some(watch.to_string()),
            output_folder: Some(output.to_string()),
            ..RawConfig::default()
        }
    }

    fn project() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("/work/less/main.less", "@import \"vars\";");
        fs.add_file("/work/less/vars.less", "@c: red;");
        fs
    }

    #[test]
    fn folders_are_made_absolute_against_cwd() {
        let fs = project();
        let settings = resolve_settings(raw("less", "./out/../css"), Path::new("/work"), &fs).unwrap();

        assert_eq!(settings.watch_folder, PathBuf::from("/work/less"));
        assert_eq!(settings.output_folder, PathBuf::from("/work/css"));
        assert!(settings.main_file.is_none());
        assert_eq!(settings.default_extension(), "less");
        assert_eq!(settings.output_extension, "css");
        assert_eq!(settings.compile.command, "lessc");
    }

    #[test]
    fn main_file_resolves_inside_watch_folder() {
        let fs = project();
        let mut cfg = raw("less", "css");
        cfg.main_file = Some("main.less".to_string());

        let settings = resolve_settings(cfg, Path::new("/work"), &fs).unwrap();
        assert_eq!(settings.main_file(), Some(Path::new("/work/less/main.less")));
        assert!(settings.is_main_mode());
    }

    #[test]
    fn missing_main_file_is_fatal() {
        let fs = project();
        let mut cfg = raw("less", "css");
        cfg.main_file = Some("nope.less".to_string());

        match resolve_settings(cfg, Path::new("/work"), &fs) {
            Err(StylewatchError::MainFileMissing(p)) => {
                assert_eq!(p, PathBuf::from("/work/less/nope.less"))
            }
            other => panic!("expected MainFileMissing, got {other:?}"),
        }
    }

    #[test]
    fn missing_watch_folder_is_fatal() {
        let fs = project();
        let err = resolve_settings(raw("scss", "css"), Path::new("/work"), &fs).unwrap_err();
        assert!(matches!(err, StylewatchError::WatchFolderNotFound(_)));
    }

    #[test]
    fn extensions_are_cleaned_and_validated() {
        let fs = project();
        let mut cfg = raw("less", "css");
        cfg.allowed_extensions = Some(vec![".less".to_string(), "css".to_string()]);
        cfg.output_extension = Some(".min.css".to_string());
        let settings = resolve_settings(cfg, Path::new("/work"), &fs).unwrap();
        assert_eq!(settings.filters.allowed_extensions, vec!["less", "css"]);
        assert_eq!(settings.output_extension, "min.css");

        let mut cfg = raw("less", "css");
        cfg.allowed_extensions = Some(Vec::new());
        let err = resolve_settings(cfg, Path::new("/work"), &fs).unwrap_err();
        assert!(matches!(err, StylewatchError::ConfigError(_)));
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let fs = project();
        let mut cfg = raw("less", "css");
        cfg.exclude = Some(vec!["vendor/[".to_string()]);
        let err = resolve_settings(cfg, Path::new("/work"), &fs).unwrap_err();
        match err {
            StylewatchError::ConfigError(msg) => assert!(msg.contains("vendor/[")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }
}
