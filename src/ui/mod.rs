//! Terminal presentation for the CLI

pub mod icon;
pub mod terminal;
pub mod theme;
pub mod views;

use std::sync::Arc;

use stylepipe::events::Event;
use stylepipe::tasks::EventSink;

use terminal::TerminalCapabilities;

/// Print events as NDJSON (`json`) or as timestamped human-readable lines.
pub fn event_sink(json: bool, caps: TerminalCapabilities) -> EventSink {
    Arc::new(move |event: Event| {
        if json {
            println!("{}", event.to_json());
            return;
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered = views::render_event(&timestamp, &event, caps);

        match event {
            Event::Error { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })
}
