//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod completions;
pub mod extract_cmd;
pub mod lookup_cmd;
pub mod merge_cmd;

use crate::config::ProjectConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "RATECARD_LOG";

/// Options every command accepts for locating the project.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory default paths resolve against when no config is given
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProjectArgs {
    /// Load the project configuration these options point at.
    pub fn load_config(&self) -> Result<ProjectConfig> {
        ProjectConfig::discover(self.config.as_deref(), &self.root)
    }
}

/// Install the stderr log subscriber.
///
/// `RATECARD_LOG` takes precedence; otherwise the level is `warn`, or
/// `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when commands run in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
