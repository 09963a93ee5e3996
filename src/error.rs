//! Error types for stylepipe
//!
//! Fatal errors abort the current run and propagate with `?`. Per-file compile
//! failures are not errors at this level: they are collected as
//! [`CompileDiagnostic`] values in the run report.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stylepipe operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Main error type for stylepipe operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source glob could not be parsed
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {}: {message}", .file.display())]
    InvalidConfig { file: PathBuf, message: String },

    /// Browserslist query could not be resolved
    #[error("invalid browser query {query:?}: {message}")]
    InvalidBrowsers { query: Vec<String>, message: String },

    /// A post-processing pass rejected the compiled CSS
    #[error("{pass} failed on {}: {message}", .file.display())]
    PostProcess {
        pass: &'static str,
        file: PathBuf,
        message: String,
    },

    /// Filesystem watcher could not be started
    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// No task is registered under the requested name
    #[error("unknown task '{name}'{}", suggestion_suffix(.suggestion))]
    UnknownTask {
        name: String,
        suggestion: Option<String>,
    },

    /// A run finished but some files failed to compile
    #[error("{count} stylesheet(s) failed to compile")]
    CompileFailures { count: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

/// A stylesheet that failed to compile.
///
/// Carries the compiler's message and, when available, the 1-based position
/// of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    pub file: PathBuf,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl CompileDiagnostic {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// `file:line:column` when a position is known, otherwise just the file.
    pub fn location(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                format!("{}:{}:{}", self.file.display(), line, column)
            }
            _ => self.file.display().to_string(),
        }
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}
