//! Output file writing
//!
//! Outputs go through a temp file in the destination directory and are
//! renamed into place, so a browser or dev server never sees a half-written
//! stylesheet.

use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::PipelineResult;

/// What happened to an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content was already byte-identical
    Unchanged,
}

/// Write content to a file atomically, creating parent directories.
pub fn write_atomic(path: &Path, content: &[u8]) -> PipelineResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write only when the file is missing or its content differs.
pub fn write_if_changed(path: &Path, content: &str) -> PipelineResult<WriteOutcome> {
    if let Ok(existing) = std::fs::read(path) {
        if existing == content.as_bytes() {
            return Ok(WriteOutcome::Unchanged);
        }
    }

    write_atomic(path, content.as_bytes())?;
    Ok(WriteOutcome::Written)
}

/// SHA-256 of `content`, formatted as `sha256:<hex>`
pub fn hash_content(content: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(content))
}
