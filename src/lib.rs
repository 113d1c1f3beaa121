// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::compile::LesscCompiler;
use crate::config::{load_settings, Settings};
use crate::engine::{initial_scan_jobs, CoreRuntime, RunSummary, Runtime, RuntimeEvent, RuntimeOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{scan_sources, spawn_watcher, WatchFilter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - the initial scan of the watch folder
/// - core / runtime with the `lessc` compiler
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("determining working directory")?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let settings = Arc::new(load_settings(&args, &cwd, fs.as_ref())?);
    debug!(?settings, "resolved settings");

    let filter = WatchFilter::new(&settings)?;
    let files = scan_sources(fs.as_ref(), &settings.watch_folder, &filter)?;

    if args.dry_run {
        print_dry_run(&settings, &files);
        return Ok(RunSummary::default());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // The initial pass is queued before the watcher starts, so every change
    // made afterwards is handled against a populated import graph.
    rt_tx
        .send(RuntimeEvent::ScanCompleted {
            files: files.clone(),
        })
        .await?;

    let _watcher_handle = if settings.run_once {
        println!(
            "[stylewatch] Compiling {} once into {}",
            settings.watch_folder.display(),
            settings.output_folder.display()
        );
        None
    } else {
        println!(
            "[stylewatch] Watching {} for changes, writing to {}",
            settings.watch_folder.display(),
            settings.output_folder.display()
        );
        Some(spawn_watcher(
            &settings,
            filter,
            Arc::clone(&fs),
            &files,
            rt_tx.clone(),
        )?)
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions {
        exit_after_scan: settings.run_once,
    };

    // Construct the pure core runtime (single source of truth for semantics).
    let core = CoreRuntime::new(Arc::clone(&settings), options);

    // Construct the async IO shell around the core.
    let compiler = LesscCompiler::new(Arc::clone(&fs));
    let runtime = Runtime::new(core, rt_rx, compiler, fs);
    let summary = runtime.run().await?;

    if settings.run_once {
        println!("[stylewatch] Done: {summary}");
    }
    info!(%summary, "stylewatch finished");
    Ok(summary)
}

/// Dry-run output: resolved settings and the units the initial scan would
/// compile.
fn print_dry_run(settings: &Settings, files: &[PathBuf]) {
    println!("stylewatch dry-run");
    println!("  watch_folder = {}", settings.watch_folder.display());
    println!("  output_folder = {}", settings.output_folder.display());
    if let Some(main) = settings.main_file() {
        println!("  main_file = {}", main.display());
    }
    println!("  run_once = {}", settings.run_once);
    println!(
        "  allowed_extensions = {:?}",
        settings.filters.allowed_extensions
    );
    println!("  output_extension = {}", settings.output_extension);
    if !settings.filters.exclude.is_empty() {
        println!("  exclude = {:?}", settings.filters.exclude);
    }
    println!("  skip_unchanged = {}", settings.skip_unchanged);
    println!("  debounce_ms = {}", settings.debounce.as_millis());

    let compile = &settings.compile;
    println!("  compile.command = {}", compile.command);
    if compile.enable_js {
        println!("  compile.enable_js = true");
    }
    if compile.source_map {
        println!("  compile.source_map = true");
    }
    if !compile.plugins.is_empty() {
        println!("  compile.plugins = {:?}", compile.plugins);
    }
    for (key, value) in &compile.args {
        println!("  compile.args.{key} = {value}");
    }
    println!();

    let jobs = initial_scan_jobs(settings, files);
    println!("sources ({}), units ({}):", files.len(), jobs.len());
    for job in jobs {
        println!(
            "  - {} -> {}",
            job.source.display(),
            job.output.display()
        );
    }

    debug!("dry-run complete (no compilation)");
}
