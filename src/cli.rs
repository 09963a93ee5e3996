use std::path::PathBuf;

use clap::Parser;
use stylepipe::Config;

/// stylepipe - compile, prefix, minify and watch SCSS stylesheets
#[derive(Parser, Debug)]
#[command(name = "stylepipe")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'stylepipe --list' to see the available tasks.")]
pub struct Cli {
    /// Task to run
    #[arg(default_value = "default")]
    pub task: String,

    /// Config file (defaults to ./stylepipe.toml, then the user config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source glob, e.g. "./src/sass/**/*.scss"
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output directory for compiled CSS
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Browserslist queries for vendor prefixing (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub browsers: Option<Vec<String>>,

    /// Use a polling watcher instead of native filesystem events
    #[arg(long)]
    pub poll: bool,

    /// List the available tasks and exit
    #[arg(long)]
    pub list: bool,

    /// Output format for CI
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flags win over config files and environment variables.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(source) = &self.source {
            config.paths.source = source.clone();
        }
        if let Some(dest) = &self.dest {
            config.paths.dest = dest.clone();
        }
        if let Some(browsers) = &self.browsers {
            config.prefix.browsers = browsers.clone();
        }
        if self.poll {
            config.watch.poll = true;
        }
        config
    }
}
