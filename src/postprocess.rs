//! Post-processing passes over compiled CSS
//!
//! Both passes are backed by `lightningcss` and share the same browser
//! targets, so the minifier never drops a prefix the prefixer just added.
//!
//! lightningcss only inserts prefixes while optimizing a stylesheet, so the
//! dev pass also normalizes it: comments are dropped, rules with the same
//! selector are merged, empty rules are removed and values are shortened
//! (`#ff0000` becomes `red`). Dev output stays pretty-printed, one
//! declaration per line; only the prod pass prints it compactly.

use std::fmt;
use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

/// A text-to-text transformation applied after compilation
pub trait PostProcessor: Send + Sync {
    /// Short name used in errors and logs
    fn name(&self) -> &'static str;

    fn process(&self, css: &str, file: &Path) -> PipelineResult<String>;
}

/// Which post-processors run after compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Vendor prefixing only
    Dev,
    /// Vendor prefixing, then minification
    Prod,
}

impl Profile {
    /// Build the ordered pass list for this profile.
    pub fn passes(self, browsers: &[String]) -> PipelineResult<Vec<Box<dyn PostProcessor>>> {
        let targets = resolve_browsers(browsers)?;

        let mut passes: Vec<Box<dyn PostProcessor>> = vec![Box::new(Autoprefixer::new(targets))];
        if self == Profile::Prod {
            passes.push(Box::new(Minifier::new(targets)));
        }
        Ok(passes)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Dev => write!(f, "dev"),
            Profile::Prod => write!(f, "prod"),
        }
    }
}

/// Resolve browserslist queries into lightningcss browser versions.
///
/// `None` means the queries matched nothing; lightningcss then leaves
/// prefixes untouched.
pub fn resolve_browsers(queries: &[String]) -> PipelineResult<Option<Browsers>> {
    Browsers::from_browserslist(queries.iter().map(String::as_str)).map_err(|e| {
        PipelineError::InvalidBrowsers {
            query: queries.to_vec(),
            message: e.to_string(),
        }
    })
}

/// Adds vendor-prefixed declarations required by the browser targets and
/// normalizes the stylesheet; output stays multi-line
#[derive(Debug, Clone, Copy)]
pub struct Autoprefixer {
    browsers: Option<Browsers>,
}

impl Autoprefixer {
    pub fn new(browsers: Option<Browsers>) -> Self {
        Self { browsers }
    }
}

impl PostProcessor for Autoprefixer {
    fn name(&self) -> &'static str {
        "autoprefixer"
    }

    fn process(&self, css: &str, file: &Path) -> PipelineResult<String> {
        transform(self.name(), css, file, self.browsers, false)
    }
}

/// Strips non-semantic whitespace and comments
#[derive(Debug, Clone, Copy)]
pub struct Minifier {
    browsers: Option<Browsers>,
}

impl Minifier {
    pub fn new(browsers: Option<Browsers>) -> Self {
        Self { browsers }
    }
}

impl PostProcessor for Minifier {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn process(&self, css: &str, file: &Path) -> PipelineResult<String> {
        transform(self.name(), css, file, self.browsers, true)
    }
}

fn transform(
    pass: &'static str,
    css: &str,
    file: &Path,
    browsers: Option<Browsers>,
    minify: bool,
) -> PipelineResult<String> {
    let error = |message: String| PipelineError::PostProcess {
        pass,
        file: file.to_path_buf(),
        message,
    };

    let mut sheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename: file.display().to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| error(e.to_string()))?;

    // Prefixes are inserted by the property handlers that run during minify().
    sheet
        .minify(MinifyOptions {
            targets: targets_for(browsers),
            ..MinifyOptions::default()
        })
        .map_err(|e| error(e.to_string()))?;

    let printed = sheet
        .to_css(PrinterOptions {
            minify,
            targets: targets_for(browsers),
            ..PrinterOptions::default()
        })
        .map_err(|e| error(e.to_string()))?;

    Ok(printed.code)
}

fn targets_for(browsers: Option<Browsers>) -> Targets {
    Targets {
        browsers,
        ..Targets::default()
    }
}
