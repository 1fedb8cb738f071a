use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "edgeline", about = "Game enrichment and betting-edge classification pipeline")]
pub struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(long, global = true, env = "EDGELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Artifact directory; overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a raw game corpus and write the loader artifact
    Load {
        /// JSON array of games, or an object with a "games" array
        #[arg(long)]
        input: PathBuf,
    },
    /// Attach weather impact to the loaded games
    Weather,
    /// Attach injury impact to the weather-enhanced games
    Injuries,
    /// Compute matchup advantage and predicted lines
    Strength,
    /// Classify predictions against closing lines into tiers
    Classify,
    /// Summarize classified opportunities
    Report {
        /// Print the JSON summary instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Run one stage by number (1-6) or name, or the whole pipeline
    Run {
        /// Stage to run; omit to run every stage
        #[arg(long)]
        stage: Option<String>,
        /// Raw corpus; required for stage 1 and for a full run
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}
