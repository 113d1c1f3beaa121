// src/engine/policy.rs

//! Recompilation policy: which unit(s) to compile for a change.
//!
//! Pure functions over the settings and the current import graph. No IO.

use std::path::{Path, PathBuf};

use crate::compile::output_path_for;
use crate::config::Settings;
use crate::engine::{CompileJob, CompileReason, MainTrigger};
use crate::graph::{normalize, ImportGraph};
use crate::types::{ChangeEvent, ChangeKind};

/// Result of applying the policy to one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Report only; never compiles and never deletes output.
    Removed(PathBuf),
    /// Compile these units, in order.
    Compile(Vec<CompileJob>),
}

/// Decide what to compile for `event`.
///
/// - Removed: nothing.
/// - Main-file mode: exactly one compile of the main file.
/// - Otherwise: one compile per direct importer of the changed file, or the
///   changed file itself when nothing imports it.
pub fn decide(settings: &Settings, graph: &ImportGraph, event: &ChangeEvent) -> Decision {
    let changed = normalize(event.path());

    if event.kind == ChangeKind::Removed {
        return Decision::Removed(changed);
    }

    if let Some(main) = settings.main_file() {
        let via = main_trigger(graph, main, &changed);
        return Decision::Compile(vec![job(
            settings,
            main,
            CompileReason::MainFile { changed, via },
        )]);
    }

    let importers = graph.dependents_of(&changed);
    if importers.is_empty() {
        return Decision::Compile(vec![job(settings, &changed, CompileReason::Direct)]);
    }

    Decision::Compile(
        importers
            .into_iter()
            .map(|importer| {
                job(
                    settings,
                    &importer,
                    CompileReason::Import {
                        changed: changed.clone(),
                    },
                )
            })
            .collect(),
    )
}

/// Units compiled by the initial pass over `files`.
///
/// In main-file mode only the main file is compiled, whatever was found.
pub fn initial_scan_jobs(settings: &Settings, files: &[PathBuf]) -> Vec<CompileJob> {
    match settings.main_file() {
        Some(main) => vec![job(settings, main, CompileReason::InitialScan)],
        None => files
            .iter()
            .map(|f| job(settings, f, CompileReason::InitialScan))
            .collect(),
    }
}

fn main_trigger(graph: &ImportGraph, main: &Path, changed: &Path) -> MainTrigger {
    if changed == main {
        MainTrigger::IsMain
    } else if graph.transitive_dependents(changed).contains(main) {
        MainTrigger::Imported
    } else {
        MainTrigger::Untracked
    }
}

fn job(settings: &Settings, source: &Path, reason: CompileReason) -> CompileJob {
    CompileJob {
        source: source.to_path_buf(),
        output: output_path_for(settings, source),
        reason,
    }
}
