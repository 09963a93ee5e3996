use stylepipe::events::Event;
use stylepipe::tasks::TaskRegistry;

use super::icon::Icon;
use super::terminal::TerminalCapabilities;

pub fn render_header(task: &str, pattern: &str, dest: &str, caps: TerminalCapabilities) -> String {
    format!(
        "{} stylepipe {}\n  Source: {}\n  Dest:   {}\n",
        Icon::Watch.colored(caps.supports_color, caps.supports_unicode),
        task,
        pattern,
        dest
    )
}

pub fn render_event(timestamp: &str, event: &Event, caps: TerminalCapabilities) -> String {
    let prefix = format!("[{}]", timestamp);
    let icon = |icon: Icon| icon.colored(caps.supports_color, caps.supports_unicode);

    match event {
        Event::RunStarted { profile, files } => format!(
            "{} {} Compiling {} file(s) ({})...\n",
            prefix,
            icon(Icon::Progress),
            files,
            profile
        ),
        Event::FileWritten { output, .. } => {
            format!("{} {} Wrote {}\n", prefix, icon(Icon::Arrow), output)
        }
        Event::FileUnchanged { output } => {
            format!("{} {} Unchanged {}\n", prefix, icon(Icon::Skip), output)
        }
        Event::PartialSkipped { source } => {
            format!("{} {} Partial {}\n", prefix, icon(Icon::Skip), source)
        }
        Event::CompileFailed {
            file,
            line,
            column,
            message,
        } => {
            let location = match (line, column) {
                (Some(line), Some(column)) => format!("{}:{}:{}", file, line, column),
                _ => file.clone(),
            };
            format!(
                "{} {} {}\n    {}\n",
                prefix,
                icon(Icon::Error),
                location,
                message
            )
        }
        Event::RunComplete {
            written,
            unchanged,
            failed,
            ..
        } => {
            if *failed > 0 {
                format!(
                    "{} {} Done: {} written, {} unchanged, {} failed\n",
                    prefix,
                    icon(Icon::Warning),
                    written,
                    unchanged,
                    failed
                )
            } else {
                format!(
                    "{} {} Done: {} written, {} unchanged\n",
                    prefix,
                    icon(Icon::Success),
                    written,
                    unchanged
                )
            }
        }
        Event::WatchStarted { root, .. } => format!(
            "{} {} Watching {} (Ctrl+C to stop)\n",
            prefix,
            icon(Icon::Watch),
            root
        ),
        Event::FileChanged { path } => {
            format!("{} {} Changed: {}\n", prefix, icon(Icon::Arrow), path)
        }
        Event::Error { message } => {
            format!("{} {} Error: {}\n", prefix, icon(Icon::Error), message)
        }
        Event::Shutdown => format!("\n{} {} Watch stopped.\n", prefix, icon(Icon::Watch)),
    }
}

pub fn render_task_list(registry: &TaskRegistry) -> String {
    let width = registry.tasks().map(|t| t.name.len()).max().unwrap_or(0);
    let mut out = String::from("Available tasks:\n");
    for task in registry.tasks() {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            task.name,
            task.description,
            width = width
        ));
    }
    out
}
