//! Command line argument parsing for the triage CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// triage - classify customer utterances into routed, prioritised tickets
#[derive(Parser, Debug, Clone)]
#[command(name = "triage")]
#[command(about = "Classify customer utterances into intents, entities, priority and routing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TriageArgs {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TriageArgs {
    /// Effective verbosity: 0 quiet, 1 normal, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a single utterance
    Classify(ClassifyArgs),

    /// Classify every line of a file
    Batch(BatchArgs),

    /// Show the intent catalog with its routing and priority tiers
    Intents(IntentsArgs),

    /// Create or check configuration files
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Options shared by every command that builds a classifier.
#[derive(Parser, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Configuration file (JSON); built-in defaults when omitted
    #[arg(short, long, value_name = "CONFIG_FILE", env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use this OpenAI-compatible embeddings endpoint for the semantic path
    #[arg(long, value_name = "URL", env = "TRIAGE_EMBEDDING_ENDPOINT")]
    pub embedding_endpoint: Option<String>,

    /// Run the embedding model in-process (needs the `embeddings-candle` feature)
    #[arg(long, conflicts_with = "embedding_endpoint")]
    pub local_embeddings: bool,

    /// Embedding model name sent to the endpoint, or the local model's repository
    #[arg(long, value_name = "MODEL")]
    pub embedding_model: Option<String>,

    /// Override the similarity threshold
    #[arg(long, value_name = "THRESHOLD")]
    pub threshold: Option<f32>,
}

/// Arguments for classifying one utterance
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// The utterance to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Also print the ticket seed a record store would open
    #[arg(long)]
    pub seed_ticket: bool,
}

/// Arguments for batch classification
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File with one utterance per line ("-" for stdin)
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Maximum number of utterances classified at the same time
    #[arg(long, default_value = "8")]
    pub concurrency: usize,

    /// Skip blank lines instead of classifying them as empty input
    #[arg(long)]
    pub skip_blank: bool,
}

/// Arguments for listing intents
#[derive(Parser, Debug, Clone)]
pub struct IntentsArgs {
    /// Configuration file (JSON); built-in defaults when omitted
    #[arg(short, long, value_name = "CONFIG_FILE", env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Configuration file commands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the default configuration as JSON
    Init,

    /// Validate a configuration file
    Check {
        /// Configuration file to validate
        #[arg(value_name = "CONFIG_FILE")]
        path: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
