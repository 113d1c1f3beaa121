// src/compile/mod.rs

//! Compile adapter layer.
//!
//! - [`backend`] defines the `CompilerBackend` trait and the structured
//!   `CompileResult` every backend returns.
//! - [`lessc`] is the production backend that runs an external compiler
//!   process.
//! - [`output`] derives output paths and writes artifacts; only the runtime
//!   calls it, after a successful compile.

pub mod backend;
pub mod lessc;
pub mod output;

pub use backend::{CompileFailure, CompileResult, CompiledArtifact, CompilerBackend};
pub use lessc::LesscCompiler;
pub use output::{output_path_for, write_artifact};
