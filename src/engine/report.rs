// src/engine/report.rs

//! User-facing status lines (stdout), one per compile attempt.
//!
//! Every line ends with ` at <local time>` so bursts of recompiles can be
//! told apart.

use std::path::Path;

use chrono::{DateTime, Local};

use crate::compile::CompileFailure;
use crate::engine::{CompileJob, CompileReason, MainTrigger};

const PREFIX: &str = "[stylewatch]";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn stamped(line: String, at: &DateTime<Local>) -> String {
    format!("{line} at {}", at.format(TIME_FORMAT))
}

/// Line printed after a successful compile.
pub fn compiled_line(job: &CompileJob, at: &DateTime<Local>) -> String {
    let src = job.source.display();
    let out = job.output.display();
    let line = match &job.reason {
        CompileReason::InitialScan => format!("{PREFIX} Compiled {src} -> {out}"),
        CompileReason::Direct => {
            format!("{PREFIX} The file {src} was changed. Recompiled {out}")
        }
        CompileReason::Import { changed } => format!(
            "{PREFIX} The file {src} was recompiled because {} is specified as an import. Recompiled {out}",
            changed.display()
        ),
        CompileReason::MainFile { changed, via } => match via {
            MainTrigger::IsMain => {
                format!("{PREFIX} The main file {src} was changed. Recompiled {out}")
            }
            MainTrigger::Imported => format!(
                "{PREFIX} The file {} was changed and is imported by main file {src}. Recompiled {out}",
                changed.display()
            ),
            MainTrigger::Untracked => format!(
                "{PREFIX} The file {} was changed. Recompiled main file {src} -> {out}",
                changed.display()
            ),
        },
    };
    stamped(line, at)
}

/// Line printed when the compiler rejected a unit.
pub fn failed_line(job: &CompileJob, failure: &CompileFailure, at: &DateTime<Local>) -> String {
    let line = format!(
        "{PREFIX} Failed to compile {}: {failure}. Kept previous output {}",
        job.source.display(),
        job.output.display()
    );
    stamped(line, at)
}

/// Line printed when a compile succeeded but the output could not be written.
pub fn write_failed_line(job: &CompileJob, error: &anyhow::Error, at: &DateTime<Local>) -> String {
    let line = format!(
        "{PREFIX} Compiled {} but could not write {}: {error:#}",
        job.source.display(),
        job.output.display()
    );
    stamped(line, at)
}

pub fn removed_line(path: &Path, at: &DateTime<Local>) -> String {
    stamped(format!("{PREFIX} {} was removed", path.display()), at)
}
