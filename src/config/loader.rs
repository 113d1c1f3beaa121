// src/config/loader.rs

use std::path::Path;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::model::{RawCompileOptions, RawConfig, Settings};
use crate::config::validate::resolve_settings;
use crate::errors::{Result, StylewatchError};
use crate::fs::FileSystem;

/// Load a config file if it exists.
///
/// A missing file is not an error (the default `stylewatch.toml` is usually
/// absent); a file that exists but fails to parse is.
pub fn load_optional(fs: &dyn FileSystem, path: &Path) -> Result<Option<RawConfig>> {
    if !fs.is_file(path) {
        debug!(?path, "no config file; using defaults");
        return Ok(None);
    }

    let contents = fs.read_to_string(path)?;
    let config: RawConfig = toml::from_str(&contents)?;
    info!("config file {:?} is loaded", path);
    Ok(Some(config))
}

/// Deep-merge `overlay` on top of `base`.
///
/// Scalars and lists in `overlay` replace those in `base` when present; the
/// `[compile]` table is merged field by field and `compile.args` key by key.
pub fn merge(base: RawConfig, overlay: RawConfig) -> RawConfig {
    RawConfig {
        watch_folder: overlay.watch_folder.or(base.watch_folder),
        output_folder: overlay.output_folder.or(base.output_folder),
        main_file: overlay.main_file.or(base.main_file),
        run_once: overlay.run_once.or(base.run_once),
        include_hidden: overlay.include_hidden.or(base.include_hidden),
        allowed_extensions: overlay.allowed_extensions.or(base.allowed_extensions),
        output_extension: overlay.output_extension.or(base.output_extension),
        exclude: overlay.exclude.or(base.exclude),
        skip_unchanged: overlay.skip_unchanged.or(base.skip_unchanged),
        debounce_ms: overlay.debounce_ms.or(base.debounce_ms),
        compile: merge_compile(base.compile, overlay.compile),
    }
}

fn merge_compile(base: RawCompileOptions, overlay: RawCompileOptions) -> RawCompileOptions {
    let mut args = base.args;
    args.extend(overlay.args);

    RawCompileOptions {
        command: overlay.command.or(base.command),
        enable_js: overlay.enable_js.or(base.enable_js),
        source_map: overlay.source_map.or(base.source_map),
        plugins: overlay.plugins.or(base.plugins),
        args,
        timeout_secs: overlay.timeout_secs.or(base.timeout_secs),
    }
}

/// Turn command-line flags into a config layer.
///
/// Boolean flags can only switch features on, so an absent flag leaves the
/// file value alone.
pub fn raw_from_cli(args: &CliArgs) -> RawConfig {
    let mut compile_args = std::collections::BTreeMap::new();
    for pair in &args.compiler_args {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => {
                compile_args.insert(key.trim().to_string(), value.trim().to_string())
            }
            None => compile_args.insert(pair.to_string(), String::new()),
        };
    }

    let plugins: Vec<String> = args
        .plugins
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    RawConfig {
        watch_folder: args.watch_folder.clone(),
        output_folder: args.output_folder.clone(),
        main_file: args.effective_main_file().map(str::to_string),
        run_once: args.run_once.then_some(true),
        compile: RawCompileOptions {
            command: args.compiler.clone(),
            enable_js: args.enable_js.then_some(true),
            source_map: args.source_map.then_some(true),
            plugins: (!plugins.is_empty()).then_some(plugins),
            args: compile_args,
            timeout_secs: None,
        },
        ..RawConfig::default()
    }
}

/// Full startup configuration pipeline: defaults <- config file <- CLI.
///
/// Relative paths (config file, folders) are taken relative to `cwd`.
pub fn load_settings(args: &CliArgs, cwd: &Path, fs: &dyn FileSystem) -> Result<Settings> {
    let config_path = cwd.join(&args.config);
    let file_layer = if args.config.is_empty() {
        None
    } else {
        load_optional(fs, &config_path)?
    };

    let mut raw = RawConfig::default();
    if let Some(file_layer) = file_layer {
        raw = merge(raw, file_layer);
    }
    raw = merge(raw, raw_from_cli(args));

    if raw.watch_folder.is_none() || raw.output_folder.is_none() {
        return Err(StylewatchError::MissingFolders);
    }

    resolve_settings(raw, cwd, fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use clap::Parser;

    fn file_layer() -> RawConfig {
        toml::from_str(
            r#"
watch_folder = "less"
output_folder = "css"
run_once = false

[compile]
source_map = true
plugins = ["clean-css"]
args = { math = "strict", "strict-units" = "off" }
"#,
        )
        .unwrap()
    }

    #[test]
    fn cli_overrides_file_and_merges_args_per_key() {
        let cli = CliArgs::parse_from([
            "stylewatch",
            "src",
            "--run-once",
            "--compiler-args",
            "strict-units=on",
        ]);

        let merged = merge(file_layer(), raw_from_cli(&cli));

        assert_eq!(merged.watch_folder.as_deref(), Some("src"));
        assert_eq!(merged.output_folder.as_deref(), Some("css"));
        assert_eq!(merged.run_once, Some(true));
        assert_eq!(merged.compile.source_map, Some(true));
        assert_eq!(merged.compile.plugins, Some(vec!["clean-css".to_string()]));
        assert_eq!(merged.compile.args.get("math").map(String::as_str), Some("strict"));
        assert_eq!(
            merged.compile.args.get("strict-units").map(String::as_str),
            Some("on")
        );
    }

    #[test]
    fn bare_compiler_arg_becomes_flag_without_value() {
        let cli = CliArgs::parse_from(["stylewatch", "--compiler-args", "ie-compat"]);
        let raw = raw_from_cli(&cli);
        assert_eq!(raw.compile.args.get("ie-compat").map(String::as_str), Some(""));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: std::result::Result<RawConfig, _> = toml::from_str("watch_dir = \"x\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_config_file_is_skipped() {
        let fs = MockFileSystem::new();
        let loaded = load_optional(&fs, Path::new("/work/stylewatch.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn missing_folders_is_a_startup_error() {
        let fs = MockFileSystem::new();
        let cli = CliArgs::parse_from(["stylewatch", "less"]);
        let err = load_settings(&cli, Path::new("/work"), &fs).unwrap_err();
        assert!(matches!(err, StylewatchError::MissingFolders));
    }
}
