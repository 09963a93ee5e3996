//! SCSS compilation
//!
//! Thin wrapper over `grass`. A failure is returned as a [`CompileDiagnostic`]
//! value so the pipeline can report it and move on to the next file.

use std::path::{Path, PathBuf};

use crate::config::CompileConfig;
use crate::error::CompileDiagnostic;
use crate::source::SourceFile;

/// Compiles one stylesheet at a time with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct StylesheetCompiler {
    load_paths: Vec<PathBuf>,
    quiet: bool,
}

impl StylesheetCompiler {
    pub fn new(config: &CompileConfig) -> Self {
        Self {
            load_paths: config.load_paths.clone(),
            quiet: config.quiet,
        }
    }

    /// Compile to expanded CSS. The file's own directory is always searched
    /// for imports; configured load paths come after it.
    pub fn compile(&self, source: &SourceFile) -> Result<String, CompileDiagnostic> {
        let mut options = grass::Options::default()
            .style(grass::OutputStyle::Expanded)
            .quiet(self.quiet);
        for path in &self.load_paths {
            options = options.load_path(path);
        }

        grass::from_path(&source.path, &options).map_err(|err| to_diagnostic(&source.path, *err))
    }
}

fn to_diagnostic(path: &Path, err: grass::Error) -> CompileDiagnostic {
    let rendered = err.to_string();

    #[allow(unreachable_patterns)]
    match err.kind() {
        grass::ErrorKind::ParseError { message, loc, .. } => {
            // grass positions are zero-based
            CompileDiagnostic::new(path, message).at(loc.begin.line + 1, loc.begin.column + 1)
        }
        grass::ErrorKind::IoError(io) => CompileDiagnostic::new(path, io.to_string()),
        grass::ErrorKind::FromUtf8Error(message) => CompileDiagnostic::new(path, message),
        _ => CompileDiagnostic::new(path, rendered),
    }
}
