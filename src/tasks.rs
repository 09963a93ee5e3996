//! Named tasks
//!
//! A [`TaskRegistry`] maps task names to [`Action`]s. It is built once at
//! startup from the resolved configuration and handed to the dispatcher.
//! Dependencies between tasks are explicit compositions
//! ([`Action::sequence`], [`Action::concurrent`]) rather than name lists.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::config::{closest_match, Config};
use crate::error::{PipelineError, PipelineResult};
use crate::events::Event;
use crate::pipeline::StylesheetPipeline;
use crate::postprocess::Profile;
use crate::watcher::{watch, WatchOptions};

/// Where events from every task go
pub type EventSink = Arc<dyn Fn(Event) + Send + Sync>;

/// Aggregated result of running one or more actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Pipeline runs performed (watch-triggered runs are not counted)
    pub runs: usize,
    /// Stylesheets that failed to compile across those runs
    pub failures: usize,
}

impl TaskOutcome {
    pub fn merge(self, other: TaskOutcome) -> TaskOutcome {
        TaskOutcome {
            runs: self.runs + other.runs,
            failures: self.failures + other.failures,
        }
    }
}

/// A zero-argument unit of work
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() -> PipelineResult<TaskOutcome> + Send + Sync>);

impl Action {
    pub fn new(f: impl Fn() -> PipelineResult<TaskOutcome> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn run(&self) -> PipelineResult<TaskOutcome> {
        (self.0)()
    }

    /// Run `actions` in order, stopping at the first error.
    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::new(move || {
            actions
                .iter()
                .try_fold(TaskOutcome::default(), |acc, action| Ok(acc.merge(action.run()?)))
        })
    }

    /// Run `actions` on scoped threads and wait for all of them.
    ///
    /// Every action runs to completion; the first error in declaration order
    /// is returned.
    pub fn concurrent(actions: Vec<Action>) -> Self {
        Action::new(move || {
            let results: Vec<PipelineResult<TaskOutcome>> = std::thread::scope(|scope| {
                let handles: Vec<_> = actions
                    .iter()
                    .map(|action| scope.spawn(move || action.run()))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|_| {
                            Err(std::io::Error::other("task panicked").into())
                        })
                    })
                    .collect()
            });

            results
                .into_iter()
                .try_fold(TaskOutcome::default(), |acc, result| Ok(acc.merge(result?)))
        })
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action")
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub name: &'static str,
    pub description: &'static str,
    action: Action,
}

/// Everything the standard tasks need, resolved once at startup
#[derive(Clone)]
pub struct TaskContext {
    pub config: Config,
    pub project_root: PathBuf,
    /// Cleared by the Ctrl+C handler to stop the watch loop
    pub running: Arc<AtomicBool>,
    pub sink: EventSink,
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, name: &'static str, description: &'static str, action: Action) {
        let task = Task {
            name,
            description,
            action,
        };
        match self.tasks.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Tasks in registration order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn run(&self, name: &str) -> PipelineResult<TaskOutcome> {
        let Some(task) = self.get(name) else {
            let names: Vec<&str> = self.tasks.iter().map(|t| t.name).collect();
            return Err(PipelineError::UnknownTask {
                name: name.to_string(),
                suggestion: closest_match(name, &names),
            });
        };

        tracing::debug!(task = task.name, "running task");
        task.action.run()
    }

    /// The built-in task table.
    pub fn standard(ctx: TaskContext) -> Self {
        let ctx = Arc::new(ctx);
        let dev = once(ctx.clone(), Profile::Dev);
        let prod = once(ctx.clone(), Profile::Prod);
        let dev_then_watch = watch_loop(ctx);

        let mut registry = Self::new();
        registry.register("default", "Alias for build", prod.clone());
        registry.register("styles", "Compile stylesheets once (prod profile)", prod.clone());
        registry.register("styles:dev", "Compile stylesheets once with vendor prefixes", dev.clone());
        registry.register("styles:prod", "Compile stylesheets once, prefixed and minified", prod.clone());
        registry.register("build", "Production build (prefixed and minified)", prod.clone());
        registry.register("build:dev", "Development build (prefixed only)", dev);
        registry.register("build:prod", "Production build (prefixed and minified)", prod);
        registry.register("watch", "Development build, then rebuild on change", dev_then_watch.clone());
        registry.register("start:dev", "Development build, then rebuild on change", dev_then_watch.clone());
        registry.register("dev", "Development build, then rebuild on change", dev_then_watch);
        registry
    }
}

/// One pipeline run with `profile`.
fn once(ctx: Arc<TaskContext>, profile: Profile) -> Action {
    Action::new(move || {
        let pipeline = StylesheetPipeline::from_config(&ctx.config, &ctx.project_root, profile)?;
        let report = pipeline.run(|event| (ctx.sink)(event))?;
        Ok(TaskOutcome {
            runs: 1,
            failures: report.failures.len(),
        })
    })
}

/// Initial dev run, then the watch loop; returns on Ctrl+C.
///
/// Only the initial run counts towards the outcome.
fn watch_loop(ctx: Arc<TaskContext>) -> Action {
    Action::new(move || {
        let pipeline = StylesheetPipeline::from_config(&ctx.config, &ctx.project_root, Profile::Dev)?;
        let options = WatchOptions::from_config(&ctx.config.watch);
        let initial = watch(&pipeline, &options, ctx.running.clone(), |event| (ctx.sink)(event))?;
        Ok(TaskOutcome {
            runs: 1,
            failures: initial.failures.len(),
        })
    })
}
