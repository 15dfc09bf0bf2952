// fencekeep/src/cli.rs
//! Command-line interface definition for `fencekeep`.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "fencekeep",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip HTML from authored markdown while keeping diagram fences intact",
    long_about = "fencekeep removes HTML markup from user-authored markdown. Fenced diagram blocks (```mermaid by default) are carried through byte-for-byte, so arrows such as `-->` survive. It can also check an edit the way a form field would, reporting markup and schema rejections.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `fencekeep` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strips markup from an input file or stdin, keeping fenced diagrams.
    #[command(about = "Strip markup from an input file or stdin, keeping fenced diagrams.")]
    Sanitize(SanitizeCommand),

    /// Normalizes one edit and reports whether it would be accepted.
    #[command(about = "Normalize one edit and report whether it would be accepted.")]
    Check(CheckCommand),

    /// Prints the diagram sources found in the input.
    #[command(about = "Print the diagram sources found in the input.")]
    Blocks(BlocksCommand),
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "FENCEKEEP_CONFIG", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Treat the input as a JSON document and sanitize every string in it.
    #[arg(long, help = "Treat the input as JSON and sanitize every string value in it.")]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "FENCEKEEP_CONFIG", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Treat the input as the initial stored value rather than a user edit.
    #[arg(long, help = "Treat the input as the initial stored value (skips all checks).")]
    pub initial: bool,

    /// Print the full report as JSON.
    #[arg(long, help = "Print the full report as JSON instead of the accepted text.")]
    pub json: bool,
}

/// Arguments for the `blocks` command.
#[derive(Parser, Debug)]
pub struct BlocksCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "FENCEKEEP_CONFIG", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,
}
