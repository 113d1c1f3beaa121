// tests/config_loading.rs

use std::fs;
use std::time::Duration;

use clap::Parser;
use tempfile::tempdir;

use stylewatch::cli::CliArgs;
use stylewatch::config::load_settings;
use stylewatch::errors::StylewatchError;
use stylewatch::fs::RealFileSystem;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["stylewatch"];
    full.extend_from_slice(argv);
    CliArgs::parse_from(full)
}

#[test]
fn missing_folders_are_a_startup_error() -> TestResult {
    let dir = tempdir()?;
    let err = load_settings(&args(&[]), dir.path(), &RealFileSystem).unwrap_err();
    assert!(matches!(err, StylewatchError::MissingFolders));

    let err = load_settings(&args(&["less"]), dir.path(), &RealFileSystem).unwrap_err();
    assert!(matches!(err, StylewatchError::MissingFolders));
    Ok(())
}

#[test]
fn nonexistent_watch_folder_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let err = load_settings(&args(&["nope", "css"]), dir.path(), &RealFileSystem).unwrap_err();
    assert!(matches!(err, StylewatchError::WatchFolderNotFound(_)));
    Ok(())
}

#[test]
fn nonexistent_main_file_is_rejected() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("less"))?;
    let err = load_settings(
        &args(&["less", "css", "--main-file", "style.less"]),
        dir.path(),
        &RealFileSystem,
    )
    .unwrap_err();
    assert!(matches!(err, StylewatchError::MainFileMissing(_)));
    Ok(())
}

#[test]
fn config_file_supplies_defaults_and_cli_wins() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("less"))?;
    fs::create_dir(dir.path().join("other"))?;
    fs::write(dir.path().join("less/style.less"), "")?;
    fs::write(
        dir.path().join("stylewatch.toml"),
        r#"
watch_folder = "less"
output_folder = "css"
main_file = "style.less"
debounce_ms = 50
exclude = ["vendor/**"]

[compile]
enable_js = true
plugins = ["autoprefix"]
args = { math = "strict", "strict-units" = "on" }
timeout_secs = 30
"#,
    )?;

    let settings = load_settings(
        &args(&["other", "--compiler-args", "math=always", "--plugins", "clean-css"]),
        dir.path(),
        &RealFileSystem,
    )?;

    let root = dir.path().canonicalize()?;
    assert_eq!(settings.watch_folder, root.join("other"));
    assert_eq!(settings.output_folder, dir.path().join("css"));
    assert_eq!(settings.debounce, Duration::from_millis(50));
    assert_eq!(settings.filters.exclude, vec!["vendor/**".to_string()]);
    assert!(settings.compile.enable_js);
    assert_eq!(settings.compile.plugins, vec!["clean-css".to_string()]);
    assert_eq!(settings.compile.args.get("math").map(String::as_str), Some("always"));
    assert_eq!(settings.compile.args.get("strict-units").map(String::as_str), Some("on"));
    assert_eq!(settings.compile.timeout, Some(Duration::from_secs(30)));
    Ok(())
}

#[test]
fn main_file_from_config_must_exist_under_the_resolved_watch_folder() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("less"))?;
    fs::write(dir.path().join("less/style.less"), "")?;
    fs::write(
        dir.path().join("stylewatch.toml"),
        "watch_folder = \"less\"\noutput_folder = \"css\"\nmain_file = \"style.less\"\n",
    )?;

    let settings = load_settings(&args(&[]), dir.path(), &RealFileSystem)?;
    let root = dir.path().canonicalize()?;
    assert_eq!(settings.main_file(), Some(root.join("less/style.less").as_path()));
    assert!(settings.is_main_mode());
    Ok(())
}

#[test]
fn unknown_keys_in_config_are_rejected() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("stylewatch.toml"), "watch_folder = \"less\"\ncolour = 1\n")?;
    let err = load_settings(&args(&[]), dir.path(), &RealFileSystem).unwrap_err();
    assert!(matches!(err, StylewatchError::TomlError(_)));
    Ok(())
}

#[test]
fn explicit_missing_config_path_is_skipped() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("less"))?;
    let settings = load_settings(
        &args(&["less", "css", "--config", "absent.toml"]),
        dir.path(),
        &RealFileSystem,
    )?;
    assert_eq!(settings.compile.command, "lessc");
    assert_eq!(settings.filters.allowed_extensions, vec!["less".to_string()]);
    assert_eq!(settings.output_extension, "css");
    Ok(())
}
