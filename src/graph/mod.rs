// src/graph/mod.rs

//! Import tracking between source files.
//!
//! - [`resolve`] turns an import reference into an absolute path (pure path
//!   algebra, never touches the disk).
//! - [`scan`] finds the raw `@import` references in source text.
//! - [`imports`] holds the per-file import sets and answers "who imports
//!   this file?".

pub mod imports;
pub mod resolve;
pub mod scan;

pub use imports::ImportGraph;
pub use resolve::{normalize, resolve_import};
pub use scan::scan_imports;
