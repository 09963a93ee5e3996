//! stylepipe - SCSS build pipeline
//!
//! Compiles SCSS sources matched by a glob into CSS, runs vendor prefixing
//! (and minification for production builds), writes the results under a
//! destination directory, and can watch the sources to rebuild on change.

pub mod compiler;
pub mod config;
pub mod error;
pub mod events;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod postprocess;
pub mod source;
pub mod tasks;
pub mod watcher;

// Re-exports for convenience
pub use compiler::StylesheetCompiler;
pub use config::Config;
pub use error::{CompileDiagnostic, PipelineError, PipelineResult};
pub use events::Event;
pub use pipeline::{RunReport, StylesheetPipeline};
pub use postprocess::{Autoprefixer, Minifier, PostProcessor, Profile};
pub use source::{SourceFile, SourceGlob};
pub use tasks::{Action, TaskContext, TaskOutcome, TaskRegistry};
pub use watcher::{watch, WatchOptions};
