// src/config/mod.rs

//! Configuration loading and validation for stylewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved `Settings` (`model.rs`).
//! - Load an optional config file and merge it with CLI flags (`loader.rs`).
//! - Validate folders, main file, and filters at startup (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_optional, load_settings, merge, raw_from_cli};
pub use model::{CompileOptions, FilterSettings, RawCompileOptions, RawConfig, Settings};
pub use validate::resolve_settings;
