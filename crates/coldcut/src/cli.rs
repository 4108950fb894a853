//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Coldcut - move long-tail media from the CMS into blob storage
///
/// Mode toggles (DRY_RUN, DELETE_MEDIA, DELETE_ONLY, ...) and credentials
/// are read from the environment or a `.env` file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "coldcut")]
#[command(version)]
pub struct Cli {
    /// Migration profile, built in (media, episode-images) or configured
    #[arg(long, default_value = "media")]
    pub profile: String,

    /// Settings file layered over the bundled defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
