// File: fencekeep-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot, non-interactive use of the core
//! transforms. Each call builds its sanitizer from the given configuration;
//! compiled fence matchers are cached, so this stays cheap across calls.

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::config::FencekeepConfig;
use crate::normalizer::{ContentNormalizer, ContentReport, NormalizeMode};
use crate::sanitizer::BlockPreservingSanitizer;
use crate::validators::{RuleValidator, SchemaValidator};

/// Sanitizes a string, preserving fenced regions.
pub fn headless_sanitize_string(config: &FencekeepConfig, content: &str) -> Result<String> {
    let sanitizer = BlockPreservingSanitizer::new(config)
        .context("Failed to build sanitizer")?;
    Ok(sanitizer.sanitize(content))
}

/// Sanitizes structured content (strings, sequences, mappings).
pub fn headless_sanitize_value(config: &FencekeepConfig, value: &Value) -> Result<Value> {
    let sanitizer = BlockPreservingSanitizer::new(config)
        .context("Failed to build sanitizer")?;
    sanitizer.sanitize_value(value).context("Failed to sanitize structured content")
}

/// Normalizes and checks one edit.
///
/// When `validator` is `None`, the schema rules from `config` are used (if any).
pub fn headless_normalize(
    config: &FencekeepConfig,
    raw: &str,
    validator: Option<&dyn SchemaValidator>,
    mode: NormalizeMode,
) -> Result<ContentReport> {
    let normalizer = ContentNormalizer::new(config).context("Failed to build normalizer")?;
    let rules = RuleValidator::compile(&config.schema).context("Failed to compile schema rules")?;
    let validator = match validator {
        Some(validator) => Some(validator),
        None if rules.is_empty() => None,
        None => {
            debug!("Validating against {} configured schema rule(s).", rules.len());
            Some(&rules as &dyn SchemaValidator)
        }
    };
    Ok(normalizer.normalize(raw, validator, mode))
}
