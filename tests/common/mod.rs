#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use stylewatch::config::Settings;
use stylewatch::engine::{CoreRuntime, RunSummary, Runtime, RuntimeEvent, RuntimeOptions};
use stylewatch::fs::mock::MockFileSystem;
use stylewatch::fs::FileSystem;
use stylewatch::types::ChangeEvent;
use stylewatch::watch::{scan_sources, WatchFilter};

pub use stylewatch_test_utils::{init_tracing, with_timeout, FakeCompiler, SettingsBuilder};

pub fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

/// A project on a mock filesystem, driven through the real runtime with a
/// fake compiler.
pub struct Harness {
    pub fs: MockFileSystem,
    pub settings: Arc<Settings>,
    pub compiler: FakeCompiler,
}

impl Harness {
    pub fn new(settings: Settings) -> Self {
        let fs = MockFileSystem::new();
        let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
        Self {
            compiler: FakeCompiler::new(shared),
            fs,
            settings: Arc::new(settings),
        }
    }

    pub fn scan(&self) -> Vec<PathBuf> {
        let filter = WatchFilter::new(&self.settings).expect("filter");
        scan_sources(&self.fs, &self.settings.watch_folder, &filter).expect("scan")
    }

    /// Run the initial scan followed by `changes`, then shut down.
    pub async fn run(&self, changes: Vec<ChangeEvent>) -> RunSummary {
        let mut events = vec![RuntimeEvent::ScanCompleted { files: self.scan() }];
        events.extend(changes.into_iter().map(RuntimeEvent::FileChanged));
        self.run_events(events).await
    }

    /// Feed `events` to a fresh runtime, then shut it down.
    pub async fn run_events(&self, events: Vec<RuntimeEvent>) -> RunSummary {
        let (tx, rx) = mpsc::channel(events.len() + 1);
        for event in events {
            tx.send(event).await.expect("send");
        }
        tx.send(RuntimeEvent::ShutdownRequested).await.expect("send");

        let core = CoreRuntime::new(Arc::clone(&self.settings), RuntimeOptions::default());
        let fs: Arc<dyn FileSystem> = Arc::new(self.fs.clone());
        let runtime = Runtime::new(core, rx, self.compiler.clone(), fs);
        with_timeout(runtime.run()).await.expect("runtime")
    }
}

/// A runtime running in the background, for scenarios that edit sources
/// between events.
pub struct LiveRuntime {
    tx: mpsc::Sender<RuntimeEvent>,
    handle: tokio::task::JoinHandle<stylewatch::errors::Result<RunSummary>>,
    compiler: FakeCompiler,
}

impl LiveRuntime {
    pub fn start(harness: &Harness) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let core = CoreRuntime::new(Arc::clone(&harness.settings), RuntimeOptions::default());
        let fs: Arc<dyn FileSystem> = Arc::new(harness.fs.clone());
        let runtime = Runtime::new(core, rx, harness.compiler.clone(), fs);
        Self {
            tx,
            handle: tokio::spawn(runtime.run()),
            compiler: harness.compiler.clone(),
        }
    }

    pub async fn send(&self, event: RuntimeEvent) {
        self.tx.send(event).await.expect("send");
    }

    pub async fn change(&self, change: ChangeEvent) {
        self.send(RuntimeEvent::FileChanged(change)).await;
    }

    /// Wait until the compiler has been called `n` times in total.
    pub async fn wait_for_compiles(&self, n: usize) {
        with_timeout(async {
            while self.compiler.compiled().len() < n {
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            }
        })
        .await;
    }

    pub async fn finish(self) -> RunSummary {
        self.send(RuntimeEvent::ShutdownRequested).await;
        with_timeout(self.handle)
            .await
            .expect("join")
            .expect("runtime")
    }
}
