// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which paths under the watch folder count as sources.
//! - The one-shot enumeration of sources at startup.
//! - Wiring up a cross-platform filesystem watcher (`notify`) and turning
//!   its events into classified, coalesced [`crate::types::ChangeEvent`]s,
//!   with whole-directory moves expanded to the sources they carry.
//! - (Optionally) content hashing to skip saves that changed nothing.
//!
//! It does **not** know about imports or compilation; it only feeds the
//! runtime.

pub mod event;
pub mod event_handler;
pub mod filter;
pub mod hash;
pub mod path_utils;
pub mod scan;
pub mod sources;
pub mod watcher;

pub use event::{classify, coalesce};
pub use filter::WatchFilter;
pub use hash::{compute_file_hash, ContentHashes};
pub use scan::scan_sources;
pub use sources::KnownSources;
pub use watcher::{spawn_watcher, WatcherHandle};
