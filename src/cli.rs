// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `stylewatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "stylewatch",
    version,
    about = "Watch a folder of stylesheet sources and recompile what changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Folder containing the stylesheet sources.
    #[arg(value_name = "WATCH_FOLDER")]
    pub watch_folder: Option<String>,

    /// Folder receiving the compiled output.
    #[arg(value_name = "OUTPUT_FOLDER")]
    pub output_folder: Option<String>,

    /// Main file, relative to the watch folder (same as `--main-file`).
    #[arg(value_name = "MAIN_FILE")]
    pub main_file_positional: Option<String>,

    /// Always recompile this file (relative to the watch folder) instead of
    /// the file that changed, e.g. `--main-file style.less`.
    #[arg(long, value_name = "FILE")]
    pub main_file: Option<String>,

    /// Path to the config file (TOML). Missing files are skipped.
    #[arg(long, value_name = "PATH", default_value = "stylewatch.toml")]
    pub config: String,

    /// Compile everything once and exit instead of watching.
    #[arg(long)]
    pub run_once: bool,

    /// Compiler command to invoke (default: `lessc`).
    #[arg(long, value_name = "CMD")]
    pub compiler: Option<String>,

    /// Allow inline JavaScript in sources.
    #[arg(long)]
    pub enable_js: bool,

    /// Generate a source map next to each output file.
    #[arg(long)]
    pub source_map: bool,

    /// Compiler plugins, comma separated.
    #[arg(long, value_name = "PLUGINS", value_delimiter = ',')]
    pub plugins: Vec<String>,

    /// Extra compiler arguments as `key=value` pairs, comma separated,
    /// e.g. `--compiler-args math=strict,strict-units=on`.
    #[arg(
        long,
        alias = "less-args",
        value_name = "ARGS",
        value_delimiter = ','
    )]
    pub compiler_args: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STYLEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve configuration and list what would be compiled, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// `--main-file` wins over the positional main file.
    pub fn effective_main_file(&self) -> Option<&str> {
        self.main_file
            .as_deref()
            .or(self.main_file_positional.as_deref())
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
