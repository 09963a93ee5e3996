//! Source selection
//!
//! A source glob such as `./src/sass/**/*.scss` is split into a walk root
//! (`src/sass`) and a pattern relative to that root (`**/*.scss`). Outputs keep
//! the path below the root, so `src/sass/pages/home.scss` lands at
//! `<dest>/pages/home.css`.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

use crate::error::{PipelineError, PipelineResult};

/// A stylesheet selected by the source glob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as found on disk
    pub path: PathBuf,
    /// Path below the glob root
    pub relative: PathBuf,
}

impl SourceFile {
    /// Partials (`_name.scss`) are only ever imported, never compiled alone.
    pub fn is_partial(&self) -> bool {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('_'))
            .unwrap_or(false)
    }

    pub fn output_path(&self, dest: &Path, extension: &str) -> PathBuf {
        destination_for(dest, &self.relative, extension)
    }
}

/// Map a root-relative source path into the destination tree.
pub fn destination_for(dest: &Path, relative: &Path, extension: &str) -> PathBuf {
    dest.join(relative).with_extension(extension)
}

/// Compiled source glob
#[derive(Debug, Clone)]
pub struct SourceGlob {
    pattern: String,
    root: PathBuf,
    matcher: GlobMatcher,
}

impl SourceGlob {
    pub fn new(pattern: &str) -> PipelineResult<Self> {
        let (root, relative) = split_pattern(pattern);

        let glob = GlobBuilder::new(&relative)
            .literal_separator(true)
            .build()
            .map_err(|e| PipelineError::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            root,
            matcher: glob.compile_matcher(),
        })
    }

    /// Resolve a relative root against `base` (normally the project directory).
    pub fn anchored(mut self, base: &Path) -> Self {
        if self.root.is_relative() {
            self.root = if self.root == Path::new(".") {
                base.to_path_buf()
            } else {
                base.join(&self.root)
            };
        }
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Directory walked for sources and watched for changes
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path below the root when `path` is selected by this glob.
    ///
    /// Watcher events may report canonical paths (e.g. through a symlinked
    /// temp dir), so both the root as given and its canonical form are tried.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let candidates = [
            path.strip_prefix(&self.root).ok().map(Path::to_path_buf),
            self.root
                .canonicalize()
                .ok()
                .and_then(|root| path.strip_prefix(root).ok().map(Path::to_path_buf)),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|rel| self.matcher.is_match(rel))
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.relative_path(path).is_some()
    }

    /// All matching files in sorted path order.
    ///
    /// A missing root yields an empty list.
    pub fn collect(&self) -> PipelineResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "source root does not exist");
            return Ok(Vec::new());
        }

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(true)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.into_path();
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            if is_hidden(relative) {
                continue;
            }
            if self.matcher.is_match(relative) {
                let relative = relative.to_path_buf();
                files.push(SourceFile { path, relative });
            }
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        tracing::debug!(count = files.len(), pattern = %self.pattern, "collected sources");
        Ok(files)
    }
}

/// Split a glob into (literal root, pattern relative to the root).
fn split_pattern(pattern: &str) -> (PathBuf, String) {
    let normalized = pattern.replace('\\', "/");
    let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);

    let segments: Vec<&str> = trimmed.split('/').collect();
    let first_meta = segments.iter().position(|s| has_glob_meta(s));

    let (root_segments, rest_segments) = match first_meta {
        Some(idx) => segments.split_at(idx),
        // A literal file path: its parent is the root.
        None => segments.split_at(segments.len().saturating_sub(1)),
    };

    let mut root = root_segments.join("/");
    if trimmed.starts_with('/') && root.is_empty() {
        root.push('/');
    }
    let root = if root.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(root)
    };

    let rest = rest_segments.join("/");
    let rest = if rest.is_empty() {
        "**/*".to_string()
    } else {
        rest
    };

    (normalize_root(root), rest)
}

/// Dotfiles and dot-directories below the root are never sources.
fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_str().map(|n| n.starts_with('.')).unwrap_or(false),
        _ => false,
    })
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

fn normalize_root(root: PathBuf) -> PathBuf {
    let mut out = PathBuf::new();
    for component in root.components() {
        match component {
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
