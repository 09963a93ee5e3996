//! The watch loop

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use notify::{EventKind, PollWatcher, RecursiveMode, Watcher};

use crate::error::PipelineResult;
use crate::events::Event;
use crate::pipeline::{RunReport, StylesheetPipeline};

use super::event::{ContentHashes, WatchOptions, WatcherState};

const RECV_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the pipeline once, then re-run it in full whenever a matched source
/// changes.
///
/// The watcher is registered and content hashes are seeded before the initial
/// run, so a save that lands while that run is reading sources still triggers
/// a follow-up run. Runs are serialized on the calling thread. Notifications
/// that arrive while a run is in flight are coalesced into at most one
/// follow-up run. A failing watch-triggered run is reported as an
/// [`Event::Error`] and the loop keeps going. Returns the initial run's report
/// once `running` is cleared.
pub fn watch(
    pipeline: &StylesheetPipeline,
    options: &WatchOptions,
    running: Arc<AtomicBool>,
    emit: impl Fn(Event),
) -> PipelineResult<RunReport> {
    let glob = pipeline.glob();

    let (tx, rx) = channel();
    let mut watcher: Box<dyn Watcher> = match options.poll {
        Some(interval) => Box::new(PollWatcher::new(
            tx,
            notify::Config::default().with_poll_interval(interval),
        )?),
        None => Box::new(notify::recommended_watcher(tx)?),
    };
    watcher.watch(glob.root(), RecursiveMode::Recursive)?;
    tracing::info!(root = %glob.root().display(), poll = options.poll.is_some(), "watching");

    let mut hashes = ContentHashes::seed(glob);
    let mut state = WatcherState::new(options.debounce);

    let initial = pipeline.run(&emit)?;

    emit(Event::WatchStarted {
        root: glob.root().display().to_string(),
        pattern: glob.pattern().to_string(),
    });

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(RECV_TIMEOUT) {
            Ok(Ok(event)) => {
                for path in relevant_paths(event) {
                    if glob.matches(&path) && hashes.changed(&path) {
                        tracing::debug!(path = %path.display(), "source changed");
                        state.add_change(path);
                    }
                }
            }
            Ok(Err(err)) => emit(Event::Error {
                message: format!("watch error: {}", err),
            }),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if state.should_run() {
            for path in state.take_changes() {
                emit(Event::FileChanged {
                    path: path.display().to_string(),
                });
            }
            if let Err(err) = pipeline.run(&emit) {
                tracing::error!(error = %err, "pipeline run failed");
                emit(Event::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    emit(Event::Shutdown);
    Ok(initial)
}

/// Paths from create/modify notifications. Removals and access events never
/// trigger a run.
fn relevant_paths(event: notify::Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any => event.paths,
        EventKind::Remove(_) | EventKind::Access(_) | EventKind::Other => Vec::new(),
    }
}
