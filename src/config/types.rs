//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PipelineResult;

use super::loader::{self, ConfigWarning};

pub const DEFAULT_SOURCE: &str = "./src/sass/**/*.scss";
pub const DEFAULT_DEST: &str = "./themes/callmenick/static/css";
pub const DEFAULT_EXTENSION: &str = "css";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Where stylesheets are read from and written to
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Glob selecting the source stylesheets
    #[serde(default = "default_source")]
    pub source: String,

    /// Destination directory
    #[serde(default = "default_dest")]
    pub dest: PathBuf,

    /// Extension given to every output file
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            dest: default_dest(),
            extension: default_extension(),
        }
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_dest() -> PathBuf {
    PathBuf::from(DEFAULT_DEST)
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// SCSS compiler settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompileConfig {
    /// Extra directories searched by `@use` / `@import`
    #[serde(default)]
    pub load_paths: Vec<PathBuf>,

    /// Silence `@warn` and `@debug` output from the compiler
    #[serde(default)]
    pub quiet: bool,
}

/// Vendor-prefixing settings
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixConfig {
    /// Browserslist queries, shared by the prefix and minify passes
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            browsers: default_browsers(),
        }
    }
}

fn default_browsers() -> Vec<String> {
    vec!["defaults".to_string()]
}

/// Watch mode settings
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Quiet period before a batch of changes triggers a run
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Use a polling watcher instead of native notifications
    #[serde(default)]
    pub poll: bool,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            poll: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub prefix: PrefixConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PipelineResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: &Path) -> PipelineResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (STYLEPIPE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }
}
