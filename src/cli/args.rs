//! Command line argument parsing for the skein CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Skein - structured query evaluation over inverted indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "skein")]
#[command(about = "Structured query evaluation over inverted indexes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SkeinArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Retrieval configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "SKEIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SkeinArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a query and show its transformed form
    Parse(ParseArgs),

    /// Run a query against an index
    Search(SearchArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for parsing a query
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Index whose parts drive part assignment
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: Option<PathBuf>,

    /// Show the boolean rather than the ranked transformation
    #[arg(long)]
    pub boolean: bool,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Index file path (JSON)
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: PathBuf,

    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Boolean retrieval instead of ranked
    #[arg(long)]
    pub boolean: bool,

    /// Maximum number of results to return
    #[arg(short = 'k', long = "requested")]
    pub requested: Option<usize>,

    /// Scoring function for ranked retrieval
    #[arg(long)]
    pub scorer: Option<String>,

    /// Extra query parameters (JSON object)
    #[arg(long, value_name = "JSON")]
    pub parameters: Option<String>,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Index file path (JSON)
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: PathBuf,

    /// Also report node statistics for this query
    #[arg(long, value_name = "QUERY")]
    pub node: Option<String>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
