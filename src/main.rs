//! stylepipe CLI - SCSS build pipeline
//!
//! Usage: stylepipe [TASK] [OPTIONS]
//!
//! Tasks:
//!   default, styles, build         Production build (prefixed + minified)
//!   styles:dev, build:dev          Development build (prefixed only)
//!   watch, dev, start:dev          Development build, then rebuild on change

mod cli;
mod ui;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stylepipe::config::Config;
use stylepipe::{PipelineError, TaskContext, TaskRegistry};

use cli::Cli;
use ui::icon::Icon;

fn main() -> Result<()> {
    let cli = Cli::parse();
    stylepipe::logging::init(cli.verbose);

    let caps = ui::terminal::detect_capabilities();
    let project_root = std::env::current_dir().context("cannot determine working directory")?;

    let (config, warnings) = match &cli.config {
        Some(path) => Config::load_with_warnings(path)?,
        None => Config::load_or_default(&project_root)?,
    };
    if !cli.json {
        for warning in &warnings {
            eprintln!(
                "{} {}",
                Icon::Warning.colored(caps.supports_color, caps.supports_unicode),
                warning
            );
        }
    }
    let config = cli.apply_overrides(config.with_env_overrides());

    let running = Arc::new(AtomicBool::new(true));
    let registry = TaskRegistry::standard(TaskContext {
        config: config.clone(),
        project_root,
        running: Arc::clone(&running),
        sink: ui::event_sink(cli.json, caps),
    });

    if cli.list {
        print!("{}", ui::views::render_task_list(&registry));
        return Ok(());
    }

    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("failed to install Ctrl+C handler")?;
    }

    if !cli.json {
        print!(
            "{}",
            ui::views::render_header(
                &cli.task,
                &config.paths.source,
                &config.paths.dest.display().to_string(),
                caps
            )
        );
    }

    let outcome = registry.run(&cli.task)?;
    tracing::debug!(runs = outcome.runs, failures = outcome.failures, "task finished");

    if outcome.failures > 0 {
        return Err(PipelineError::CompileFailures {
            count: outcome.failures,
        }
        .into());
    }

    Ok(())
}
