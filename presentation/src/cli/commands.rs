//! CLI command definitions

use clap::{Parser, ValueEnum};
use oracle_domain::QueryKind;
use std::path::PathBuf;

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Consensus, every responder and the scoring metrics
    Full,
    /// Only the verdict and the consensus answer
    Summary,
    /// JSON output
    Json,
}

impl From<oracle_domain::OutputFormat> for OutputFormat {
    fn from(format: oracle_domain::OutputFormat) -> Self {
        match format {
            oracle_domain::OutputFormat::Full => OutputFormat::Full,
            oracle_domain::OutputFormat::Summary => OutputFormat::Summary,
            oracle_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for consensus-oracle
#[derive(Parser, Debug)]
#[command(name = "consensus-oracle")]
#[command(author, version, about = "Ask several responders, keep the answer they agree on")]
#[command(long_about = r#"
Consensus Oracle asks the same question of several independent responders,
clusters their answers by agreement and reports the consensus answer with a
confidence score and a hallucination-risk score.

A query is "verified" when the winning group holds at least the consensus
threshold of the total answer weight and enough responders participated,
"disputed" otherwise, and "failed" when no responder answered in time.

Configuration files are loaded from (in priority order):
1. ORACLE_* environment variables (e.g. ORACLE_QUERY__TIMEOUT_MS=5000)
2. --config <path>     Explicit config file
3. ./oracle.toml       Project-level config
4. ~/.config/consensus-oracle/config.toml   Global config

Example:
  consensus-oracle "What is the current population of Tokyo?"
  consensus-oracle --kind calculation -n 5 "Calculate the square root of 144"
  consensus-oracle --output json --threshold 0.9 "Explain quantum computing"
"#)]
pub struct Cli {
    /// The question to ask
    pub query: Option<String>,

    /// Kind of question: fact, opinion, calculation or prediction
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<QueryKind>,

    /// Number of responders to ask
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub responders: Option<usize>,

    /// Agreement ratio required for a verified answer (0.5-1.0)
    #[arg(short, long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Overall deadline in milliseconds (at least 1000)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
