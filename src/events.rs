//! Events emitted by pipeline runs and the watch loop
//!
//! Every observable step is an [`Event`]. The CLI renders them either as
//! human-readable lines or, with `--json`, as one NDJSON object per line.

use serde::Serialize;

use crate::error::CompileDiagnostic;
use crate::postprocess::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    RunStarted {
        profile: Profile,
        files: usize,
    },
    FileWritten {
        source: String,
        output: String,
    },
    FileUnchanged {
        output: String,
    },
    PartialSkipped {
        source: String,
    },
    CompileFailed {
        file: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },
    RunComplete {
        profile: Profile,
        written: usize,
        unchanged: usize,
        partials: usize,
        failed: usize,
    },
    WatchStarted {
        root: String,
        pattern: String,
    },
    FileChanged {
        path: String,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl Event {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::CompileFailed { .. } | Event::Error { .. })
    }
}

impl From<&CompileDiagnostic> for Event {
    fn from(diag: &CompileDiagnostic) -> Self {
        Event::CompileFailed {
            file: diag.file.display().to_string(),
            line: diag.line,
            column: diag.column,
            message: diag.message.clone(),
        }
    }
}
