// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated import graph
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from the channel
//! - running the compiler and writing output
//! - feeding compile results back in before the next event
//!
//! The core is unit tested without any Tokio, channels, filesystem, or
//! processes.

use std::sync::Arc;

use crate::config::Settings;
use crate::engine::event_handlers::{
    handle_compile_finished, handle_file_changed, handle_scan_completed, CoreStep,
};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::graph::ImportGraph;

/// Pure core runtime state.
///
/// This owns the import graph and the run options. It has **no** channels,
/// no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    settings: Arc<Settings>,
    graph: ImportGraph,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(settings: Arc<Settings>, options: RuntimeOptions) -> Self {
        let graph = ImportGraph::new(settings.default_extension());
        Self {
            settings,
            graph,
            options,
        }
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Read-only view of the import graph (for tests and diagnostics).
    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ScanCompleted { files } => {
                handle_scan_completed(&self.settings, &self.options, &files)
            }
            RuntimeEvent::FileChanged(change) => {
                handle_file_changed(&self.settings, &mut self.graph, &change)
            }
            RuntimeEvent::CompileFinished { source, outcome } => {
                handle_compile_finished(&mut self.graph, &source, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
