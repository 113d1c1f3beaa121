// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::compile::{write_artifact, CompileResult, CompilerBackend};
use crate::engine::report;
use crate::errors::Result;
use crate::fs::FileSystem;

use super::core::CoreRuntime;
use super::{CompileJob, CompileOutcome, CoreCommand, RuntimeEvent};

/// Counts of compile attempts over the lifetime of a runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} compiled, {} failed", self.succeeded, self.failed)
    }
}

/// Drives the core in response to `RuntimeEvent`s and delegates compiling
/// to a `CompilerBackend`.
///
/// Events are handled strictly one at a time: every compile selected for an
/// event is awaited, written, and fed back into the core (refreshing the
/// import graph) before the next event is read from the channel.
pub struct Runtime<C: CompilerBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    compiler: C,
    fs: Arc<dyn FileSystem>,
    summary: RunSummary,
}

impl<C: CompilerBackend> fmt::Debug for Runtime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<C: CompilerBackend> Runtime<C> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        compiler: C,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            core,
            event_rx,
            compiler,
            fs,
            summary: RunSummary::default(),
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes the commands returned by the core (compile, report, exit).
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("stylewatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!(summary = %self.summary, "runtime exiting");
        Ok(self.summary)
    }

    async fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Compile(job) => self.compile(job).await,
            CoreCommand::ReportRemoved(path) => {
                println!("{}", report::removed_line(&path, &Local::now()))
            }
            CoreCommand::RequestExit => debug!("core issued RequestExit command"),
        }
    }

    /// Compile one unit, write its output on success, and feed the outcome
    /// back into the core. Never fails: compile and write errors are
    /// reported and the loop carries on.
    async fn compile(&mut self, job: CompileJob) {
        let settings = Arc::clone(self.core.settings());
        debug!(source = ?job.source, output = ?job.output, "compiling");

        let result = self
            .compiler
            .compile(&job.source, &job.output, &settings.compile)
            .await;

        let outcome = match result {
            CompileResult::Success(artifact) => {
                match write_artifact(self.fs.as_ref(), &job.output, &artifact) {
                    Ok(written) => {
                        self.summary.succeeded += 1;
                        debug!(?written, "output written");
                        println!("{}", report::compiled_line(&job, &Local::now()));
                    }
                    Err(err) => {
                        self.summary.failed += 1;
                        warn!(output = ?job.output, error = %err, "failed to write output");
                        println!("{}", report::write_failed_line(&job, &err, &Local::now()));
                    }
                }
                CompileOutcome::Success {
                    imports: artifact.imports,
                }
            }
            CompileResult::Failure(failure) => {
                self.summary.failed += 1;
                warn!(
                    source = ?job.source,
                    file = ?failure.file,
                    line = ?failure.line,
                    message = %failure.message,
                    "compile failed"
                );
                println!("{}", report::failed_line(&job, &failure, &Local::now()));
                CompileOutcome::Failed
            }
        };

        // Recording happens here, before the next event is read.
        self.core.step(RuntimeEvent::CompileFinished {
            source: job.source,
            outcome,
        });
    }
}
