// fencekeep/src/commands/mod.rs
//! Subcommand implementations and the input/config plumbing they share.

pub mod blocks;
pub mod check;
pub mod sanitize;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use owo_colors::OwoColorize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use fencekeep_core::config::{merge_config, FencekeepConfig};

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Loads the embedded defaults and layers an optional user file on top.
pub fn load_config(user_path: Option<&Path>) -> Result<FencekeepConfig> {
    let defaults = FencekeepConfig::load_default().context("Failed to load default configuration")?;
    let user = match user_path {
        Some(path) => Some(
            FencekeepConfig::load_from_file(path)
                .context("Failed to load user-defined configuration file")?,
        ),
        None => None,
    };
    Ok(merge_config(defaults, user))
}

/// Prints `error: <msg>` to stderr, coloured when stderr is a terminal.
pub fn error_msg(msg: impl AsRef<str>) {
    let mut stderr = io::stderr();
    let _ = if stderr.is_terminal() {
        writeln!(stderr, "{} {}", "error:".red().bold(), msg.as_ref())
    } else {
        writeln!(stderr, "error: {}", msg.as_ref())
    };
}
