use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Impact-Lens - claims, impact and critical questions for news articles"
)]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep storage in memory for this run (nothing is persisted)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand (default: show usage and the last analysis)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze an article from a text file or a JSON page snapshot
    Analyze {
        /// Article file (`.json` is read as a rendered page snapshot)
        file: PathBuf,

        /// Page URL sent with the article (text files only)
        #[arg(long)]
        url: Option<String>,

        /// Page title sent with the article (text files only)
        #[arg(long)]
        title: Option<String>,

        /// Language for this analysis (nl, en, de, es)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Show this month's usage
    Usage {
        /// Reset the counter for the current month
        #[arg(long)]
        reset: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last analysis if it is less than an hour old
    Last,
    /// Show or set the panel language
    Language {
        /// Language tag (nl, en, de, es); unknown tags select nl
        tag: Option<String>,
    },
    /// Open the payment page
    Upgrade {
        /// Manage an existing subscription instead of choosing a plan
        #[arg(long)]
        manage: bool,
    },
    /// Check that the analysis service is reachable
    Health,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
