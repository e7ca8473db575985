use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct ShellCli {
    /// Directory to start in, defaults to the current working directory
    #[arg(short = 'd', long)]
    pub start_dir: Option<PathBuf>,

    /// Maximum level of the diagnostic logs written to stderr
    #[arg(short, long, default_value_t = Level::WARN)]
    pub log_level: Level,

    /// Read plain lines from stdin instead of using the line editor
    #[arg(short, long)]
    pub plain: bool,
}
