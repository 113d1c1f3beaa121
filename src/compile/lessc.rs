// src/compile/lessc.rs

//! Compiler backend that shells out to `lessc` (or a compatible command).

use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::compile::backend::{CompileResult, CompiledArtifact, CompilerBackend};
use crate::compile::output::source_map_path;
use crate::config::CompileOptions;
use crate::fs::FileSystem;
use crate::graph::scan_imports;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi regex"));

static LOCATED_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<msg>.*?) in (?P<file>\S+) on line (?P<line>\d+)")
        .expect("valid compiler error regex")
});

/// Runs the configured compiler command once per source file.
///
/// The compiler writes into a private temporary directory; the generated
/// text is read back and handed to the runtime, which decides where it goes.
/// Source map references are computed against the final output path, not
/// the temporary one.
#[derive(Debug, Clone)]
pub struct LesscCompiler {
    fs: Arc<dyn FileSystem>,
}

impl LesscCompiler {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    async fn compile_inner(
        &self,
        source: &Path,
        output: &Path,
        options: &CompileOptions,
    ) -> CompileResult {
        let text = match self.fs.read_to_string(source) {
            Ok(t) => t,
            Err(err) => return CompileResult::failure(format!("{err:#}"), source, None),
        };
        let imports = scan_imports(&text);

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => {
                return CompileResult::failure(
                    format!("creating scratch directory: {err}"),
                    source,
                    None,
                );
            }
        };
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let out_file = scratch.path().join(format!("{stem}.css"));

        let args = build_args(options, source, output, &out_file);
        debug!(command = %options.command, ?args, "invoking compiler");

        let mut cmd = Command::new(&options.command);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = source.parent() {
            cmd.current_dir(dir);
        }

        let run = cmd.output();
        let finished = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(?source, ?limit, "compiler timed out; process killed");
                    return CompileResult::failure(
                        format!("compiler did not finish within {}s", limit.as_secs()),
                        source,
                        None,
                    );
                }
            },
            None => run.await,
        };

        let finished = match finished {
            Ok(o) => o,
            Err(err) => {
                return CompileResult::failure(
                    format!("failed to start compiler '{}': {err}", options.command),
                    source,
                    None,
                );
            }
        };

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            let stdout = String::from_utf8_lossy(&finished.stdout);
            let report = if stderr.trim().is_empty() { stdout } else { stderr };
            return parse_failure(&report, source);
        }

        match read_outputs(&out_file, options.source_map).await {
            Ok((css, source_map)) => CompileResult::Success(CompiledArtifact {
                css,
                source_map,
                imports,
            }),
            Err(err) => CompileResult::failure(format!("{err:#}"), source, None),
        }
    }
}

impl CompilerBackend for LesscCompiler {
    fn compile<'a>(
        &'a mut self,
        source: &'a Path,
        output: &'a Path,
        options: &'a CompileOptions,
    ) -> Pin<Box<dyn Future<Output = CompileResult> + Send + 'a>> {
        Box::pin(self.compile_inner(source, output, options))
    }
}

/// Command-line arguments for one compile.
///
/// `out_file` is where the compiler writes; `output` is where the result
/// finally lands. With source maps on, the map URL names the map next to
/// `output` and source paths are rooted relative to `output`'s directory.
pub fn build_args(
    options: &CompileOptions,
    source: &Path,
    output: &Path,
    out_file: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--no-color".into()];

    if options.enable_js {
        args.push("--js".into());
    }
    if options.source_map {
        args.push("--source-map".into());
        args.push(format!("--source-map-rootpath={}", source_map_rootpath(source, output)).into());
        if let Some(name) = source_map_path(output).file_name() {
            let mut url = OsString::from("--source-map-url=");
            url.push(name);
            args.push(url);
        }
    }
    for plugin in &options.plugins {
        args.push(format!("--plugin={plugin}").into());
    }
    for (key, value) in &options.args {
        let key = key.trim_start_matches('-');
        if value.is_empty() {
            args.push(format!("--{key}").into());
        } else {
            args.push(format!("--{key}={value}").into());
        }
    }

    args.push(source.as_os_str().to_os_string());
    args.push(out_file.as_os_str().to_os_string());
    args
}

/// Directory of `source` as seen from the directory of `output`, with
/// forward slashes and a trailing one. lessc rejects an empty value, so the
/// same directory is `./`.
fn source_map_rootpath(source: &Path, output: &Path) -> String {
    let (Some(source_dir), Some(output_dir)) = (source.parent(), output.parent()) else {
        return "./".to_string();
    };
    let relative = pathdiff::diff_paths(source_dir, output_dir).unwrap_or_default();
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        "./".to_string()
    } else {
        format!("{}/", parts.join("/"))
    }
}

/// Turn compiler diagnostics into a structured failure.
///
/// Recognises the usual `<Kind>Error: <message> in <file> on line <n>`
/// shape; anything else is reported verbatim against `source`.
pub fn parse_failure(report: &str, source: &Path) -> CompileResult {
    let clean = ANSI.replace_all(report, "");

    if let Some(caps) = LOCATED_ERROR.captures(&clean) {
        let message = caps
            .name("msg")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let file = caps
            .name("file")
            .map(|m| PathBuf::from(m.as_str()))
            .unwrap_or_else(|| source.to_path_buf());
        let line = caps.name("line").and_then(|m| m.as_str().parse().ok());
        return CompileResult::failure(message, file, line);
    }

    let message = clean
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("compiler exited with an error")
        .to_string();
    CompileResult::failure(message, source, None)
}

async fn read_outputs(out_file: &Path, want_map: bool) -> Result<(String, Option<String>)> {
    let css = tokio::fs::read_to_string(out_file)
        .await
        .with_context(|| format!("reading compiler output {:?}", out_file))?;

    let source_map = if want_map {
        let mut map_path = out_file.as_os_str().to_os_string();
        map_path.push(".map");
        tokio::fs::read_to_string(PathBuf::from(map_path)).await.ok()
    } else {
        None
    };

    Ok((css, source_map))
}
