//! Configuration module for stylepipe
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STYLEPIPE_*)
//! 3. Project config (./stylepipe.toml)
//! 4. User config (~/.config/stylepipe/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub(crate) use loader::closest_match;
pub use loader::{with_env_overrides, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{
    CompileConfig, Config, PathsConfig, PrefixConfig, WatchConfig, DEFAULT_DEBOUNCE_MS,
    DEFAULT_DEST, DEFAULT_EXTENSION, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SOURCE,
};
