// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::event::{classify, coalesce};
use crate::watch::event_handler::process_changes;
use crate::watch::filter::WatchFilter;
use crate::watch::hash::ContentHashes;
use crate::watch::sources::KnownSources;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a recursive watcher on the watch folder that sends
/// `RuntimeEvent::FileChanged` for every accepted source change.
///
/// - Raw events arriving within `settings.debounce` of the first one are
///   batched, classified, and coalesced per path before being forwarded.
/// - Moved or renamed directories are expanded into one change per source.
/// - `seed` is the result of the initial scan. It seeds the set of known
///   sources, and with `skip_unchanged` its contents are hashed up front so
///   the first save of an untouched file is recognised.
pub fn spawn_watcher(
    settings: &Settings,
    filter: WatchFilter,
    fs: Arc<dyn FileSystem>,
    seed: &[PathBuf],
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = settings.watch_folder.clone();
    let debounce = settings.debounce;

    let mut known = KnownSources::new(seed);

    let mut hashes = if settings.skip_unchanged {
        let mut hashes = ContentHashes::new();
        hashes.seed(fs.as_ref(), seed);
        debug!(seeded = hashes.len(), "content hashes seeded");
        Some(hashes)
    } else {
        None
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("stylewatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("stylewatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(first) = event_rx.recv().await {
            let mut batch = vec![first];

            if !debounce.is_zero() {
                let deadline = Instant::now() + debounce;
                loop {
                    match timeout_at(deadline, event_rx.recv()).await {
                        Ok(Some(event)) => batch.push(event),
                        Ok(None) | Err(_) => break,
                    }
                }
            }

            debug!(raw = batch.len(), "processing notify batch");

            let changes: Vec<_> = batch
                .iter()
                .flat_map(|event| classify(event, fs.as_ref()))
                .collect();
            let changes = coalesce(known.expand(changes, fs.as_ref(), &filter));

            if !process_changes(changes, &filter, hashes.as_mut(), fs.as_ref(), &runtime_tx).await
            {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
