// src/engine/mod.rs

//! Orchestration engine for stylewatch.
//!
//! This module ties together:
//! - the recompilation policy (which units to compile for a change)
//! - the import graph (owned by the core, refreshed after every compile)
//! - the main runtime event loop that reacts to:
//!   - the initial scan
//!   - classified filesystem changes
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::types::ChangeEvent;

/// How a main-file compile relates to the file that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTrigger {
    /// The main file itself changed.
    IsMain,
    /// The changed file is reachable from the main file through imports.
    Imported,
    /// Not (yet) known to be part of the main bundle.
    Untracked,
}

/// Why a unit is being compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileReason {
    /// Part of the initial full-tree pass.
    InitialScan,
    /// The changed file itself; nothing imports it.
    Direct,
    /// The unit imports `changed`.
    Import { changed: PathBuf },
    /// Main-file mode: every change recompiles the main file.
    MainFile { changed: PathBuf, via: MainTrigger },
}

/// A compilation unit selected by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub reason: CompileReason,
}

/// What the core needs to know about a finished compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success { imports: Vec<String> },
    Failed,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Exit once the initial scan has been compiled (used for `run_once`).
    pub exit_after_scan: bool,
}

/// Events flowing into the runtime from the scanner, the watcher, and the
/// shell itself.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The one-shot enumeration of the watch folder finished.
    ScanCompleted { files: Vec<PathBuf> },
    /// A classified change that passed the watch filters.
    FileChanged(ChangeEvent),
    /// A compile finished; sent by the shell before it takes the next event.
    CompileFinished {
        source: PathBuf,
        outcome: CompileOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod policy;
pub mod report;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use policy::{decide, initial_scan_jobs, Decision};
pub use runtime::{RunSummary, Runtime};
