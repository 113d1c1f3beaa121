// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only startup failures surface as [`StylewatchError`]. Per-file compile
//! failures are ordinary values (`CompileResult::Failure`) and never abort
//! the watch loop.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylewatchError {
    #[error("missing arguments: both a watch folder and an output folder are required")]
    MissingFolders,

    #[error("watch folder {0:?} does not exist")]
    WatchFolderNotFound(PathBuf),

    #[error("main file {0:?} does not exist")]
    MainFileMissing(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StylewatchError>;
