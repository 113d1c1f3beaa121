use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stylewatch::compile::{CompileResult, CompiledArtifact, CompilerBackend};
use stylewatch::config::CompileOptions;
use stylewatch::fs::FileSystem;
use stylewatch::graph::scan_imports;

/// A fake compiler that:
/// - records which sources were compiled, in order
/// - reads the source through the given `FileSystem` and reports its imports
///   the way the real adapter does
/// - produces deterministic CSS derived from the source text
/// - fails for sources registered with [`FakeCompiler::fail_on`] or that
///   cannot be read.
///
/// Clones share the call log and the failure set.
#[derive(Clone)]
pub struct FakeCompiler {
    fs: Arc<dyn FileSystem>,
    compiled: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl FakeCompiler {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            compiled: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn fail_on(&self, source: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(source.into());
    }

    pub fn stop_failing(&self, source: impl AsRef<Path>) {
        self.failing.lock().unwrap().remove(source.as_ref());
    }

    /// Every source passed to `compile`, in order.
    pub fn compiled(&self) -> Vec<PathBuf> {
        self.compiled.lock().unwrap().clone()
    }

    /// The CSS this compiler emits for `source` with the given contents.
    pub fn expected_css(source: &Path, contents: &str) -> String {
        format!("/* {} */\n{}", source.display(), contents)
    }
}

impl CompilerBackend for FakeCompiler {
    fn compile<'a>(
        &'a mut self,
        source: &'a Path,
        _output: &'a Path,
        options: &'a CompileOptions,
    ) -> Pin<Box<dyn Future<Output = CompileResult> + Send + 'a>> {
        Box::pin(async move {
            // Read before recording, so a test that saw the call logged may
            // edit the source without racing this compile.
            let read = self.fs.read_to_string(source);
            self.compiled.lock().unwrap().push(source.to_path_buf());

            if self.failing.lock().unwrap().contains(source) {
                return CompileResult::failure("scripted failure", source, Some(1));
            }

            let contents = match read {
                Ok(c) => c,
                Err(err) => return CompileResult::failure(err.to_string(), source, None),
            };

            CompileResult::Success(CompiledArtifact {
                css: Self::expected_css(source, &contents),
                source_map: options
                    .source_map
                    .then(|| format!("{{\"sources\":[\"{}\"]}}", source.display())),
                imports: scan_imports(&contents),
            })
        })
    }
}
