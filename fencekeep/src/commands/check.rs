// fencekeep/src/commands/check.rs
//! `fencekeep check`: run one edit through the normalizer, the way a form
//! field would, and report the outcome through the exit status.

use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use std::io::{self, Write};
use std::process::ExitCode;

use fencekeep_core::{ContentReport, FencekeepConfig, NormalizeMode, headless_normalize};

use crate::cli::CheckCommand;
use crate::commands::{error_msg, load_config, read_input};

/// Entry point for the parsed `check` subcommand.
///
/// Exits with `0` when the edit is accepted (or bypassed) and `1` when it is
/// rejected.
pub fn run_check(cmd: &CheckCommand) -> Result<ExitCode> {
    let config = load_config(cmd.config.as_deref())?;
    let input = read_input(cmd.input_file.as_deref())?;
    let mode = if cmd.initial { NormalizeMode::InitialLoad } else { NormalizeMode::Edit };

    let report = check_content(&config, &input, mode)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cmd.json {
        writeln!(out, "{}", report_json(&report)?)?;
    } else if let Some(text) = printable_text(&report) {
        write!(out, "{}", text)?;
    }
    out.flush().context("Failed to flush stdout")?;

    if report.error.is_some() {
        error_msg(report.error_text());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Normalizes `input` with the schema rules from `config`.
pub fn check_content(config: &FencekeepConfig, input: &str, mode: NormalizeMode) -> Result<ContentReport> {
    let report = headless_normalize(config, input, None, mode)?;
    if report.is_bypassed() {
        info!("Initial value loaded without checks.");
    } else if let Some(error) = &report.error {
        info!("Content rejected: {}", error);
    } else {
        info!("Content accepted.");
    }
    Ok(report)
}

/// The text to echo on stdout: the accepted value, or the raw value for an
/// initial load.
fn printable_text(report: &ContentReport) -> Option<&str> {
    if report.is_bypassed() {
        Some(report.normalized_text.as_str())
    } else {
        report.accepted_value()
    }
}

/// Renders a report as pretty JSON.
pub fn report_json(report: &ContentReport) -> Result<String> {
    let value = json!({
        "normalized_text": report.normalized_text,
        "is_disallowed_markup": report.is_disallowed_markup,
        "accepted": report.accepted_value(),
        "bypassed": report.is_bypassed(),
        "error": report.error.as_ref().map(|_| report.error_text()),
    });
    serde_json::to_string_pretty(&value).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_for_rejection() -> Result<()> {
        let config = FencekeepConfig::load_default()?;
        let report = check_content(&config, "<b>x</b>", NormalizeMode::Edit)?;
        let value: serde_json::Value = serde_json::from_str(&report_json(&report)?)?;
        assert_eq!(value["is_disallowed_markup"], true);
        assert_eq!(value["accepted"], serde_json::Value::Null);
        assert_eq!(value["error"], "Html tags not supported");
        Ok(())
    }

    #[test]
    fn test_report_json_for_acceptance() -> Result<()> {
        let config = FencekeepConfig::load_default()?;
        let report = check_content(&config, "```mermaid\nA --&gt; B\n```", NormalizeMode::Edit)?;
        let value: serde_json::Value = serde_json::from_str(&report_json(&report)?)?;
        assert_eq!(value["accepted"], "```mermaid\nA --> B\n```");
        assert_eq!(value["error"], serde_json::Value::Null);
        Ok(())
    }
}
