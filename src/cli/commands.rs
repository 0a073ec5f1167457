//! CLI commands and argument parsing

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Normalize tabular files into streaming JSON
#[derive(Parser, Debug)]
#[command(name = "tabnorm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Transform settings file (YAML, or JSON by extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for command results
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform one file into a JSON document
    Transform {
        /// Source file
        input: PathBuf,

        /// Destination file (created or truncated)
        #[arg(short, long)]
        output: PathBuf,

        /// Declared MIME type; overrides the file extension
        #[arg(short = 't', long)]
        content_type: Option<String>,
    },

    /// Transform several files concurrently
    Batch {
        /// Source files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving `<stem>.json` per input
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Print the content type a file resolves to
    Detect {
        /// File name to inspect
        file: PathBuf,

        /// Declared MIME type
        #[arg(short = 't', long)]
        content_type: Option<String>,
    },

    /// Resolve a connection descriptor into a driver and connection string
    #[command(group(ArgGroup::new("source").required(true).args(["descriptor", "descriptor_json"])))]
    Resolve {
        /// Descriptor file (JSON)
        #[arg(short, long)]
        descriptor: Option<PathBuf>,

        /// Inline descriptor JSON
        #[arg(long)]
        descriptor_json: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
