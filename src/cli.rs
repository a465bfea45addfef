use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ModPlan - compute install plans for game mod archives
#[derive(Parser)]
#[command(name = "modplan")]
#[command(about = "Work out where the files of a mod archive go for a supported game")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the one in the ModPlan data directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Don't echo log messages to stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List known games and their installers
    Games,
    /// Check which installer supports an archive
    Test {
        /// Game id (e.g. elex, dawnofman, torchlight2)
        #[arg(short, long)]
        game: String,
        /// File list (one entry per line), .zip archive, or extracted directory
        source: PathBuf,
    },
    /// Print the copy plan for an archive
    Install {
        #[arg(short, long)]
        game: String,
        /// Staging directory the archive was extracted to; names the mod folder
        #[arg(short, long)]
        destination: String,
        /// File list (one entry per line), .zip archive, or extracted directory
        source: PathBuf,
    },
}
