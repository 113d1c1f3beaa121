// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::policy::{decide, initial_scan_jobs, Decision};
use crate::engine::{CompileJob, CompileOutcome, RuntimeOptions};
use crate::graph::ImportGraph;
use crate::types::ChangeEvent;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Compile this unit, write its output, then report back with
    /// `RuntimeEvent::CompileFinished` before taking the next event.
    Compile(CompileJob),
    /// Tell the user a source was removed.
    ReportRemoved(PathBuf),
    /// Request that the process exits (used for `run_once`).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running once the commands
    /// are done.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// Handle the end of the initial enumeration.
pub fn handle_scan_completed(
    settings: &Settings,
    options: &RuntimeOptions,
    files: &[PathBuf],
) -> CoreStep {
    let jobs = initial_scan_jobs(settings, files);
    info!(
        sources = files.len(),
        units = jobs.len(),
        "initial scan complete"
    );

    let mut commands: Vec<CoreCommand> = jobs.into_iter().map(CoreCommand::Compile).collect();

    let keep_running = !options.exit_after_scan;
    if !keep_running {
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running,
    }
}

/// Handle one classified filesystem change.
pub fn handle_file_changed(
    settings: &Settings,
    graph: &mut ImportGraph,
    change: &ChangeEvent,
) -> CoreStep {
    match decide(settings, graph, change) {
        Decision::Removed(path) => {
            // Inbound edges stay; a recreated file still reaches its importers.
            let forgotten = graph.forget(&path);
            debug!(?path, forgotten, "source removed");
            CoreStep {
                commands: vec![CoreCommand::ReportRemoved(path)],
                keep_running: true,
            }
        }
        Decision::Compile(jobs) => {
            debug!(
                changed = ?change.path,
                kind = %change.kind,
                units = jobs.len(),
                "policy selected units"
            );
            CoreStep {
                commands: jobs.into_iter().map(CoreCommand::Compile).collect(),
                keep_running: true,
            }
        }
    }
}

/// Refresh the import graph after a compile.
///
/// A failed compile leaves the previous entry untouched.
pub fn handle_compile_finished(
    graph: &mut ImportGraph,
    source: &Path,
    outcome: CompileOutcome,
) -> CoreStep {
    match outcome {
        CompileOutcome::Success { imports } => graph.record_imports(source, imports.as_slice()),
        CompileOutcome::Failed => {
            debug!(?source, "compile failed; keeping previous imports");
        }
    }
    CoreStep::idle()
}
