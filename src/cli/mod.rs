//! CLI module
//!
//! Command-line interface for running transforms.
//!
//! # Commands
//!
//! - `transform` - Normalize one file
//! - `batch` - Normalize many files concurrently
//! - `detect` - Show the resolved content type
//! - `resolve` - Build a database connection string

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
