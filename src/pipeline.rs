//! The stylesheet pipeline
//!
//! One run = collect sources, then for each file: compile, post-process in
//! order, write. Compile failures are collected per file and never stop the
//! run; post-processing and I/O failures abort it.

use std::path::{Path, PathBuf};

use crate::compiler::StylesheetCompiler;
use crate::config::Config;
use crate::error::{CompileDiagnostic, PipelineResult};
use crate::events::Event;
use crate::fs::{write_if_changed, WriteOutcome};
use crate::postprocess::{PostProcessor, Profile};
use crate::source::{SourceFile, SourceGlob};

/// Outcome of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Output files that were created or rewritten
    pub written: Vec<PathBuf>,
    /// Output files whose content was already up to date
    pub unchanged: Vec<PathBuf>,
    /// Partials that were matched but not compiled on their own
    pub partials: Vec<PathBuf>,
    pub failures: Vec<CompileDiagnostic>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Outputs produced by this run, written or already current
    pub fn outputs(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

pub struct StylesheetPipeline {
    glob: SourceGlob,
    dest: PathBuf,
    extension: String,
    profile: Profile,
    compiler: StylesheetCompiler,
    passes: Vec<Box<dyn PostProcessor>>,
}

impl StylesheetPipeline {
    pub fn new(glob: SourceGlob, dest: impl Into<PathBuf>, profile: Profile) -> Self {
        Self {
            glob,
            dest: dest.into(),
            extension: crate::config::DEFAULT_EXTENSION.to_string(),
            profile,
            compiler: StylesheetCompiler::default(),
            passes: Vec::new(),
        }
    }

    /// Build the pipeline for `profile` with paths resolved against `project_root`.
    pub fn from_config(config: &Config, project_root: &Path, profile: Profile) -> PipelineResult<Self> {
        let glob = SourceGlob::new(&config.paths.source)?.anchored(project_root);
        let dest = if config.paths.dest.is_relative() {
            project_root.join(&config.paths.dest)
        } else {
            config.paths.dest.clone()
        };
        let passes = profile.passes(&config.prefix.browsers)?;

        Ok(Self::new(glob, dest, profile)
            .with_extension(&config.paths.extension)
            .with_compiler(StylesheetCompiler::new(&config.compile))
            .with_passes(passes))
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_compiler(mut self, compiler: StylesheetCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_passes(mut self, passes: Vec<Box<dyn PostProcessor>>) -> Self {
        self.passes = passes;
        self
    }

    pub fn glob(&self) -> &SourceGlob {
        &self.glob
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Run the pipeline once over every matched file.
    pub fn run(&self, emit: impl Fn(Event)) -> PipelineResult<RunReport> {
        let sources = self.glob.collect()?;
        emit(Event::RunStarted {
            profile: self.profile,
            files: sources.len(),
        });
        tracing::info!(profile = %self.profile, files = sources.len(), "pipeline run started");

        let mut report = RunReport::default();
        for source in &sources {
            if source.is_partial() {
                tracing::debug!(source = %source.path.display(), "skipping partial");
                emit(Event::PartialSkipped {
                    source: source.path.display().to_string(),
                });
                report.partials.push(source.path.clone());
                continue;
            }

            let css = match self.render(source)? {
                Ok(css) => css,
                Err(diag) => {
                    tracing::warn!(location = %diag.location(), "compile failed: {}", diag.message);
                    emit(Event::from(&diag));
                    report.failures.push(diag);
                    continue;
                }
            };

            let output = source.output_path(&self.dest, &self.extension);
            match write_if_changed(&output, &css)? {
                WriteOutcome::Written => {
                    emit(Event::FileWritten {
                        source: source.path.display().to_string(),
                        output: output.display().to_string(),
                    });
                    report.written.push(output);
                }
                WriteOutcome::Unchanged => {
                    emit(Event::FileUnchanged {
                        output: output.display().to_string(),
                    });
                    report.unchanged.push(output);
                }
            }
        }

        emit(Event::RunComplete {
            profile: self.profile,
            written: report.written.len(),
            unchanged: report.unchanged.len(),
            partials: report.partials.len(),
            failed: report.failures.len(),
        });
        tracing::info!(
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            failed = report.failures.len(),
            "pipeline run complete"
        );

        Ok(report)
    }

    /// Compile and post-process one file.
    ///
    /// The outer result is fatal; the inner one is the per-file compile outcome.
    fn render(&self, source: &SourceFile) -> PipelineResult<Result<String, CompileDiagnostic>> {
        // Empty sources pass straight through as empty outputs.
        if std::fs::metadata(&source.path)?.len() == 0 {
            return Ok(Ok(String::new()));
        }

        let compiled = match self.compiler.compile(source) {
            Ok(css) => css,
            Err(diag) => return Ok(Err(diag)),
        };

        let mut css = compiled;
        for pass in &self.passes {
            tracing::trace!(pass = pass.name(), source = %source.path.display(), "post-processing");
            css = pass.process(&css, &source.path)?;
        }
        Ok(Ok(css))
    }
}
