// fencekeep/src/commands/blocks.rs
//! `fencekeep blocks`: list the diagram sources in the input.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Write};

use fencekeep_core::get_or_compile_fences;

use crate::cli::BlocksCommand;
use crate::commands::{load_config, read_input};

/// Entry point for the parsed `blocks` subcommand.
pub fn run_blocks(cmd: &BlocksCommand) -> Result<()> {
    let config = load_config(cmd.config.as_deref())?;
    let fences = get_or_compile_fences(&config.fences).context("Failed to compile fence matcher")?;
    let input = read_input(cmd.input_file.as_deref())?;

    let sources = fences.diagram_sources(&input);
    debug!("Found {} diagram source(s).", sources.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_sources(&mut out, &sources)?;
    out.flush().context("Failed to flush stdout")
}

/// Writes each source on its own, separated by a blank line.
pub fn write_sources<W: Write, S: AsRef<str>>(writer: &mut W, sources: &[S]) -> Result<()> {
    for (index, source) in sources.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", source.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sources_separates_with_blank_line() -> Result<()> {
        let mut buffer = Vec::new();
        write_sources(&mut buffer, &["graph LR\nA --> B", "pie"])?;
        assert_eq!(String::from_utf8(buffer)?, "graph LR\nA --> B\n\npie\n");

        let mut empty = Vec::new();
        write_sources::<_, &str>(&mut empty, &[])?;
        assert!(empty.is_empty());
        Ok(())
    }
}
