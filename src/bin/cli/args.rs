//! CLI argument structures.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Function-level clone detection over a source tree
#[derive(Parser)]
#[command(name = "draupnir")]
#[command(version = VERSION)]
#[command(about = "Draupnir - large-variance code clone detection")]
#[command(long_about = "
Detect function-level code clones across a source tree. Functions are
tokenized and normalized, candidate pairs are located through a partitioned
n-gram inverted index, and survivors are verified with LCS similarity.

Common Usage:

  # Detect clones in a Java tree with the default thresholds
  draupnir detect ./src

  # Python corpus, more index partitions to cap memory
  draupnir detect --language python --partition-count 32 ./repo

  # Start from a YAML configuration and override one option
  draupnir detect --config draupnir.yml --verification-threshold 80 ./src

  # Print the default configuration
  draupnir print-default-config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect clone pairs in a source tree
    Detect(Box<DetectArgs>),

    /// Print the default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// List supported languages and their file extensions
    #[command(name = "list-languages")]
    ListLanguages,
}

/// Arguments for the detect command
#[derive(Args)]
pub struct DetectArgs {
    /// Source tree to analyze
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Directory receiving clone_pairs.csv and code_blocks.csv
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// YAML configuration file; command-line options override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language to tokenize (java, c, cpp, csharp, python, kotlin)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Minimum function length in lines
    #[arg(long)]
    pub min_line: Option<usize>,

    /// Minimum token count after normalization
    #[arg(long)]
    pub min_token: Option<usize>,

    /// N-gram width
    #[arg(short = 'n', long)]
    pub gram_size: Option<usize>,

    /// Number of index partitions
    #[arg(short, long)]
    pub partition_count: Option<usize>,

    /// Early-cutoff n-gram similarity percentage
    #[arg(short, long)]
    pub filtration_threshold: Option<u32>,

    /// Acceptance threshold for fast-path and LCS similarity
    #[arg(short = 'r', long)]
    pub verification_threshold: Option<u32>,

    /// Worker threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,
}
