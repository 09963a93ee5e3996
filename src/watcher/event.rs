//! Watch options and debounce state

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::WatchConfig;
use crate::fs::hash_content;
use crate::source::SourceGlob;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = crate::config::DEFAULT_DEBOUNCE_MS;

/// Watch options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Quiet period before pending changes trigger a run
    pub debounce: Duration,
    /// Poll interval; `None` uses native filesystem notifications
    pub poll: Option<Duration>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            poll: None,
        }
    }
}

impl WatchOptions {
    pub fn from_config(config: &WatchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            poll: config
                .poll
                .then(|| Duration::from_millis(config.poll_interval_ms)),
        }
    }
}

/// Watcher state for debouncing
///
/// Changes accumulate until `debounce` has passed since the latest one; the
/// whole batch then triggers a single run.
pub(crate) struct WatcherState {
    pub(crate) pending_changes: HashSet<PathBuf>,
    pub(crate) last_change: Option<Instant>,
    debounce: Duration,
}

impl WatcherState {
    pub(crate) fn new(debounce: Duration) -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
            debounce,
        }
    }

    pub(crate) fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_run(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty() && last.elapsed() >= self.debounce
        } else {
            false
        }
    }

    /// Drain pending changes in sorted order.
    pub(crate) fn take_changes(&mut self) -> Vec<PathBuf> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }
}

/// Last seen content hash per source file.
///
/// Editors often fire several notifications per save (or touch files without
/// changing them); only a real content change counts.
#[derive(Debug, Default)]
pub(crate) struct ContentHashes {
    hashes: HashMap<PathBuf, String>,
}

impl ContentHashes {
    /// Seed from every file currently matched by `glob`.
    pub(crate) fn seed(glob: &SourceGlob) -> Self {
        let mut hashes = HashMap::new();
        if let Ok(files) = glob.collect() {
            for file in files {
                if let Ok(content) = std::fs::read(&file.path) {
                    hashes.insert(canonical(&file.path), hash_content(&content));
                }
            }
        }
        Self { hashes }
    }

    /// Record the file's current hash; true when it differs from the last one.
    ///
    /// Unreadable files (e.g. deleted again before we got to them) never count.
    pub(crate) fn changed(&mut self, path: &Path) -> bool {
        let Ok(content) = std::fs::read(path) else {
            return false;
        };
        let new_hash = hash_content(&content);
        let key = canonical(path);

        if self.hashes.get(&key) == Some(&new_hash) {
            return false;
        }
        self.hashes.insert(key, new_hash);
        true
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
