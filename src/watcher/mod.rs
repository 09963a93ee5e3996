//! File watcher for continuous rebuilds
//!
//! Implements the watch loop with:
//! - Debouncing (100ms by default)
//! - Content-hash filtering of editor noise
//! - Serialized, full pipeline runs
//! - Graceful Ctrl+C shutdown

mod event;
#[cfg(test)]
mod tests;
mod watch_loop;

pub use event::{WatchOptions, DEBOUNCE_MS};
pub use watch_loop::watch;
