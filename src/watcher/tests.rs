//! Tests for the watcher module

use super::event::{ContentHashes, WatchOptions, WatcherState, DEBOUNCE_MS};
use super::watch_loop::watch;
use crate::config::{Config, WatchConfig};
use crate::events::Event;
use crate::pipeline::StylesheetPipeline;
use crate::postprocess::Profile;
use crate::source::SourceGlob;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn debounce() -> Duration {
    Duration::from_millis(DEBOUNCE_MS)
}

#[test]
fn test_watcher_state_debouncing() {
    let mut state = WatcherState::new(debounce());

    // No changes yet
    assert!(!state.should_run());

    state.add_change(PathBuf::from("main.scss"));

    // Should not run immediately (debounce)
    assert!(!state.should_run());

    thread::sleep(Duration::from_millis(DEBOUNCE_MS + 10));
    assert!(state.should_run());

    let changes = state.take_changes();
    assert_eq!(changes.len(), 1);

    // No more pending
    assert!(!state.should_run());
}

#[test]
fn test_watcher_state_coalesce_changes() {
    let mut state = WatcherState::new(debounce());

    state.add_change(PathBuf::from("main.scss"));
    state.add_change(PathBuf::from("main.scss"));
    state.add_change(PathBuf::from("main.scss"));

    thread::sleep(Duration::from_millis(DEBOUNCE_MS + 10));

    let changes = state.take_changes();
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_watcher_state_multiple_files_sorted() {
    let mut state = WatcherState::new(debounce());

    state.add_change(PathBuf::from("c.scss"));
    state.add_change(PathBuf::from("a.scss"));
    state.add_change(PathBuf::from("b.scss"));

    thread::sleep(Duration::from_millis(DEBOUNCE_MS + 10));

    let changes = state.take_changes();
    assert_eq!(
        changes,
        vec![
            PathBuf::from("a.scss"),
            PathBuf::from("b.scss"),
            PathBuf::from("c.scss"),
        ]
    );
}

#[test]
fn test_watch_options_from_config() {
    let options = WatchOptions::from_config(&WatchConfig::default());
    assert_eq!(options, WatchOptions::default());

    let options = WatchOptions::from_config(&WatchConfig {
        debounce_ms: 20,
        poll: true,
        poll_interval_ms: 75,
    });
    assert_eq!(options.debounce, Duration::from_millis(20));
    assert_eq!(options.poll, Some(Duration::from_millis(75)));
}

#[test]
fn test_content_hashes_ignore_touches() {
    let dir = tempdir().unwrap();
    let sass = dir.path().join("sass");
    fs::create_dir_all(&sass).unwrap();
    let file = sass.join("main.scss");
    fs::write(&file, "a { b: c; }").unwrap();

    let glob = SourceGlob::new("sass/**/*.scss").unwrap().anchored(dir.path());
    let mut hashes = ContentHashes::seed(&glob);

    // Seeded: same content is not a change
    assert!(!hashes.changed(&file));

    fs::write(&file, "a { b: d; }").unwrap();
    assert!(hashes.changed(&file));
    assert!(!hashes.changed(&file));

    // New files count as changes
    let added = sass.join("extra.scss");
    fs::write(&added, "x { y: z; }").unwrap();
    assert!(hashes.changed(&added));

    // Missing files never do
    assert!(!hashes.changed(&sass.join("gone.scss")));
}

fn setup_project(dir: &Path) {
    let sass = dir.join("src/sass");
    fs::create_dir_all(&sass).unwrap();
    fs::write(sass.join("main.scss"), ".a { color: red; }\n").unwrap();
}

fn watch_config() -> Config {
    let mut config = Config::default();
    config.prefix.browsers = vec!["safari 6".to_string()];
    config
}

fn count_runs(events: &Mutex<Vec<Event>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, Event::RunComplete { .. }))
        .count()
}

fn run_watch_in_background(
    root: PathBuf,
    events: Arc<Mutex<Vec<Event>>>,
    running: Arc<AtomicBool>,
    on_event: impl Fn(&Event) + Send + 'static,
) -> thread::JoinHandle<crate::error::PipelineResult<crate::pipeline::RunReport>> {
    thread::spawn(move || {
        let pipeline = StylesheetPipeline::from_config(&watch_config(), &root, Profile::Dev).unwrap();
        watch(&pipeline, &WatchOptions::default(), running, |event| {
            on_event(&event);
            events.lock().unwrap().push(event);
        })
    })
}

fn wait_for_runs(events: &Mutex<Vec<Event>>, runs: usize) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while count_runs(events) < runs && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }
}

fn output_css(root: &Path) -> String {
    fs::read_to_string(root.join("themes/callmenick/static/css/main.css")).unwrap()
}

#[test]
fn test_watch_runs_once_before_watching() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());
    let pipeline = StylesheetPipeline::from_config(&watch_config(), dir.path(), Profile::Dev).unwrap();

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    let running = Arc::new(AtomicBool::new(false)); // Stop right after the initial run

    let report = watch(&pipeline, &WatchOptions::default(), running, |event| {
        events_clone.lock().unwrap().push(event);
    })
    .unwrap();

    assert_eq!(report.written.len(), 1);
    assert!(output_css(dir.path()).contains("red"));

    let captured = events.lock().unwrap();
    assert!(matches!(captured.first(), Some(Event::RunStarted { .. })));
    let complete = captured
        .iter()
        .position(|e| matches!(e, Event::RunComplete { .. }))
        .unwrap();
    let started = captured
        .iter()
        .position(|e| matches!(e, Event::WatchStarted { .. }))
        .unwrap();
    assert!(complete < started);
    assert!(matches!(captured.last(), Some(Event::Shutdown)));
}

#[test]
fn test_watch_missing_root_is_error_without_events() {
    let dir = tempdir().unwrap();
    let pipeline = StylesheetPipeline::from_config(&watch_config(), dir.path(), Profile::Dev).unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let events: Mutex<Vec<Event>> = Mutex::new(Vec::new());

    let result = watch(&pipeline, &WatchOptions::default(), running, |event| {
        events.lock().unwrap().push(event);
    });

    assert!(result.is_err());
    assert!(events.lock().unwrap().is_empty(), "nothing is reported as watched");
}

#[test]
fn test_watch_modification_triggers_exactly_one_run() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());
    let root = dir.path().to_path_buf();

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let running = Arc::new(AtomicBool::new(true));
    let handle = run_watch_in_background(root.clone(), events.clone(), running.clone(), |_| {});

    wait_for_runs(&events, 1);
    // Give the watcher time to settle after the initial run
    thread::sleep(Duration::from_millis(500));
    assert_eq!(count_runs(&events), 1);

    fs::write(root.join("src/sass/main.scss"), ".a { margin: 7px; }\n").unwrap();

    wait_for_runs(&events, 2);
    // Let any stray notifications settle
    thread::sleep(Duration::from_millis(500));

    running.store(false, Ordering::SeqCst);
    handle.join().unwrap().unwrap();

    assert_eq!(count_runs(&events), 2);
    assert!(output_css(&root).contains("7px"));

    let captured = events.lock().unwrap();
    assert!(captured
        .iter()
        .any(|e| matches!(e, Event::FileChanged { path } if path.ends_with("main.scss"))));
}

#[test]
fn test_save_during_initial_run_is_rebuilt() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());
    let root = dir.path().to_path_buf();
    let source = root.join("src/sass/main.scss");

    // Rewrite the source right after the initial run has read and written it.
    let edited = Arc::new(AtomicBool::new(false));
    let on_event = {
        let edited = edited.clone();
        let source = source.clone();
        move |event: &Event| {
            if matches!(event, Event::FileWritten { .. }) && !edited.swap(true, Ordering::SeqCst) {
                fs::write(&source, ".a { margin: 9px; }\n").unwrap();
            }
        }
    };

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let running = Arc::new(AtomicBool::new(true));
    let handle = run_watch_in_background(root.clone(), events.clone(), running.clone(), on_event);

    let deadline = Instant::now() + Duration::from_secs(10);
    while !output_css(&root).contains("9px") && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }

    running.store(false, Ordering::SeqCst);
    handle.join().unwrap().unwrap();

    assert!(edited.load(Ordering::SeqCst));
    assert!(count_runs(&events) >= 2);
    assert!(output_css(&root).contains("9px"), "edit was never compiled");
}
