// src/compile/backend.rs

//! Pluggable compiler backend abstraction.
//!
//! The runtime talks to a `CompilerBackend` instead of spawning processes
//! itself. Production uses [`super::LesscCompiler`]; tests plug in a fake
//! that records which files were compiled.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::config::CompileOptions;

/// Output of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub css: String,
    pub source_map: Option<String>,
    /// Raw import references found in the source, in source order.
    pub imports: Vec<String>,
}

/// Structured compiler error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub message: String,
    /// File the compiler blamed; may be an imported file rather than the
    /// unit being compiled.
    pub file: PathBuf,
    pub line: Option<u32>,
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file.display(), line, self.message),
            None => write!(f, "{}: {}", self.file.display(), self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    Success(CompiledArtifact),
    Failure(CompileFailure),
}

impl CompileResult {
    pub fn failure(
        message: impl Into<String>,
        file: impl Into<PathBuf>,
        line: Option<u32>,
    ) -> Self {
        CompileResult::Failure(CompileFailure {
            message: message.into(),
            file: file.into(),
            line,
        })
    }
}

/// Trait abstracting how one source file is compiled.
///
/// Implementations must not write into the output tree; the runtime owns
/// output writes so that a failed compile never touches previous output.
/// `output` is where the runtime will put the result, so that references
/// embedded in the artifact (source map URL and source paths) can be made
/// relative to it.
pub trait CompilerBackend: Send {
    fn compile<'a>(
        &'a mut self,
        source: &'a Path,
        output: &'a Path,
        options: &'a CompileOptions,
    ) -> Pin<Box<dyn Future<Output = CompileResult> + Send + 'a>>;
}
