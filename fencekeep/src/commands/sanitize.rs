// fencekeep/src/commands/sanitize.rs
//! `fencekeep sanitize`: strip markup, keep fenced diagrams.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use fencekeep_core::BlockPreservingSanitizer;

use crate::cli::SanitizeCommand;
use crate::commands::{load_config, read_input};

/// Options for [`run_sanitize_opts`].
pub struct SanitizeOptions {
    pub input: String,
    pub output_path: Option<PathBuf>,
    pub json: bool,
}

/// Entry point for the parsed `sanitize` subcommand.
pub fn run_sanitize(cmd: &SanitizeCommand) -> Result<()> {
    let config = load_config(cmd.config.as_deref())?;
    let sanitizer = BlockPreservingSanitizer::new(&config).context("Failed to build sanitizer")?;
    let opts = SanitizeOptions {
        input: read_input(cmd.input_file.as_deref())?,
        output_path: cmd.output.clone(),
        json: cmd.json,
    };
    run_sanitize_opts(&sanitizer, opts)
}

/// Sanitizes `opts.input` and writes the result.
pub fn run_sanitize_opts(sanitizer: &BlockPreservingSanitizer, opts: SanitizeOptions) -> Result<()> {
    info!("Starting sanitize operation.");

    let sanitized = if opts.json {
        sanitizer
            .sanitize_json(&opts.input)
            .context("Failed to sanitize JSON input")?
    } else {
        sanitizer.sanitize(&opts.input)
    };

    debug!(
        "Content sanitized. Original length: {}, Sanitized length: {}",
        opts.input.len(),
        sanitized.len()
    );

    write_output(opts.output_path.as_ref(), &sanitized, opts.json)?;
    info!("Sanitize operation completed.");
    Ok(())
}

/// Writes to the output file or stdout. Text output is written as-is; JSON
/// output gets a trailing newline.
fn write_output(path: Option<&PathBuf>, content: &str, json: bool) -> Result<()> {
    match path {
        Some(path) => {
            info!("Writing sanitized content to file: {}", path.display());
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            emit(&mut file, content, json)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            emit(&mut writer, content, json)?;
            writer.flush().context("Failed to flush stdout")
        }
    }
}

fn emit<W: Write>(writer: &mut W, content: &str, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", content)?;
    } else {
        write!(writer, "{}", content)?;
    }
    Ok(())
}
