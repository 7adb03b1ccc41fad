use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "videocut")]
#[command(about = "Batch video trimmer driven by a plain-text job file", long_about = None)]
pub struct Cli {
    /// Path to the job configuration file (see CONFIG.md for the format)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Probe hardware encoders and report which paths are usable
    Detect {
        /// Print the probe report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the ffmpeg commands for a job file without executing (dry run)
    DryRun {
        /// Path to the job configuration file
        config: PathBuf,

        /// Print jobs and their argument lists as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
