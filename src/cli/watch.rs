//! Watch mode: recompile on input changes.
//!
//! Every detected change recomputes the whole pipeline from scratch; there
//! is no incremental recompilation. A failed run is reported and the watcher
//! stays alive, so one bad edit never kills the development loop.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::args::Arguments;
use super::run_once;

/// Run-coalescing latch for watch mode.
///
/// A run request arriving while a run is in flight is remembered as exactly
/// one pending re-run, never queued further. An in-flight run is never
/// cancelled.
#[derive(Debug, Default)]
pub struct RunLatch {
    in_flight: bool,
    rerun_pending: bool,
}

impl RunLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a run. Returns `true` when the caller should start one now;
    /// otherwise the request is folded into the pending re-run.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            self.rerun_pending = true;
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Mark the current run finished. Returns `true` when a pending request
    /// means the caller should run once more.
    pub fn finish(&mut self) -> bool {
        assert!(self.in_flight, "RunLatch::finish without a run in flight");
        if self.rerun_pending {
            self.rerun_pending = false;
            true
        } else {
            self.in_flight = false;
            false
        }
    }
}

/// Watch the input directory and recompile on every change batch.
///
/// Compilation runs on a worker thread so the event loop stays responsive;
/// change batches arriving mid-run fold into the latch instead of queueing.
pub fn watch(args: &Arguments) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
        let _ = tx.send(event);
    })
    .context("failed to initialize the file watcher")?;
    watcher
        .watch(&args.input_dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch '{}'", args.input_dir.display()))?;

    println!("Watching {} for changes...", args.input_dir.display());

    let latch = Arc::new(Mutex::new(RunLatch::new()));
    let (run_tx, run_rx) = mpsc::channel::<()>();

    let worker = {
        let latch = Arc::clone(&latch);
        let args = args.clone();
        thread::spawn(move || {
            while run_rx.recv().is_ok() {
                // Failures are reported inside run_once; watch mode keeps
                // going.
                drain_runs(&latch, || {
                    let _ = run_once(&args);
                });
            }
        })
    };

    if latch.lock().expect("run latch poisoned").request() {
        let _ = run_tx.send(());
    }

    while let Ok(event) = rx.recv() {
        if !is_relevant(&event) {
            continue;
        }
        // Editors often emit several events per save; let the burst settle
        // and fold it into one run.
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}

        if latch.lock().expect("run latch poisoned").request() {
            let _ = run_tx.send(());
        }
    }

    drop(run_tx);
    let _ = worker.join();
    Ok(())
}

/// Run until the latch has no pending re-run left.
fn drain_runs(latch: &Mutex<RunLatch>, mut run: impl FnMut()) {
    loop {
        run();
        if !latch.lock().expect("run latch poisoned").finish() {
            break;
        }
    }
}

/// Whether a watcher notification should trigger a recompile.
fn is_relevant(event: &notify::Result<Event>) -> bool {
    let Ok(event) = event else {
        // Watcher errors are transient; the next event retries anyway.
        return false;
    };
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    // Ignore dotfiles (editor swap files and the like).
    let all_hidden = !event.paths.is_empty()
        && event.paths.iter().all(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        });
    !all_hidden
}
