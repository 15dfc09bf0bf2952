//! Configuration management for `fencekeep-core`.
//!
//! This module defines the configuration consumed by the sanitizer and the
//! normalizer: which fence languages are preserved, recursion limits for
//! structured content, the editor workaround sequence and the schema rules
//! applied to accepted text. Configurations are YAML, with a built-in default
//! embedded in the crate.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use log::{debug, info};
use regex::Regex;

use crate::fences::compiler::validate_language_tag;
use crate::validators::{SchemaCheck, SchemaRule};

/// The fence language preserved when nothing else is configured.
pub const DEFAULT_FENCE_LANGUAGE: &str = "mermaid";
/// Default nesting limit for structured content.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Encoded space the rich-text editor leaves at the end of lines.
pub const DEFAULT_TRAILING_ESCAPE: &str = "&#x20;";
/// Fixed message reported when markup is found outside fenced regions.
pub const DISALLOWED_MARKUP_MESSAGE: &str = "Html tags not supported";

/// Which fenced regions are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct FenceConfig {
    /// Language tags that open a preserved region (e.g. `mermaid`).
    pub languages: Vec<String>,
}

impl Default for FenceConfig {
    fn default() -> Self {
        Self { languages: vec![DEFAULT_FENCE_LANGUAGE.to_string()] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Maximum number of nested sequences/mappings in structured content.
    pub max_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Sequence stripped from the end of every line before validation.
    pub trailing_escape: String,
    /// Message reported when markup is found outside fenced regions.
    pub disallowed_markup_message: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            trailing_escape: DEFAULT_TRAILING_ESCAPE.to_string(),
            disallowed_markup_message: DISALLOWED_MARKUP_MESSAGE.to_string(),
        }
    }
}

/// Represents the top-level configuration structure for fencekeep.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FencekeepConfig {
    pub fences: FenceConfig,
    pub sanitizer: SanitizerConfig,
    pub normalizer: NormalizerConfig,
    /// Schema rules applied to text that passed the markup check.
    pub schema: Vec<SchemaRule>,
}

impl FencekeepConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FencekeepConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(
            "Loaded config from {}: {} fence language(s), {} schema rule(s).",
            path.display(),
            config.fences.languages.len(),
            config.schema.len()
        );

        Ok(config)
    }

    /// Loads the built-in configuration embedded in the crate.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default config from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: FencekeepConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default config")?;

        debug!("Default config preserves fences: [{}]", config.fences.languages.join(", "));
        Ok(config)
    }
}

/// Overlays a user configuration on top of the defaults.
///
/// Scalar sections come from the user file. Schema rules are merged by name:
/// a user rule replaces the default rule of the same name in place, new rules
/// are appended in the order the user declared them.
pub fn merge_config(
    default_config: FencekeepConfig,
    user_config: Option<FencekeepConfig>,
) -> FencekeepConfig {
    let Some(user_cfg) = user_config else {
        debug!("merge_config called without user config; using defaults.");
        return default_config;
    };

    debug!(
        "Merging user config: {} language(s), {} schema rule(s).",
        user_cfg.fences.languages.len(),
        user_cfg.schema.len()
    );

    let mut schema = default_config.schema;
    let positions: HashMap<String, usize> = schema
        .iter()
        .enumerate()
        .map(|(i, rule)| (rule.name.clone(), i))
        .collect();
    for user_rule in user_cfg.schema {
        match positions.get(&user_rule.name) {
            Some(&i) => {
                debug!("Overriding schema rule '{}' with user definition.", user_rule.name);
                schema[i] = user_rule;
            }
            None => schema.push(user_rule),
        }
    }

    FencekeepConfig {
        fences: user_cfg.fences,
        sanitizer: user_cfg.sanitizer,
        normalizer: user_cfg.normalizer,
        schema,
    }
}

/// Validates configuration integrity (language tags, limits, schema rules).
pub fn validate_config(config: &FencekeepConfig) -> Result<()> {
    let mut errors = Vec::new();

    let mut languages = HashSet::new();
    for tag in &config.fences.languages {
        if let Err(e) = validate_language_tag(tag) {
            errors.push(e.to_string());
        } else if !languages.insert(tag.as_str()) {
            errors.push(format!("Duplicate fence language found: '{}'.", tag));
        }
    }

    if config.sanitizer.max_depth == 0 {
        errors.push("`sanitizer.max_depth` must be greater than 0.".to_string());
    }

    if config.normalizer.disallowed_markup_message.trim().is_empty() {
        errors.push("`normalizer.disallowed_markup_message` cannot be empty.".to_string());
    }

    let mut rule_names = HashSet::new();
    for rule in &config.schema {
        if rule.name.is_empty() {
            errors.push("A schema rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate schema rule name found: '{}'.", rule.name));
        }

        match &rule.check {
            SchemaCheck::Pattern { pattern } => {
                if let Err(e) = Regex::new(pattern) {
                    errors.push(format!("Schema rule '{}' has an invalid regex pattern: {}", rule.name, e));
                }
            }
            SchemaCheck::MinLength { min } => {
                if let Some(max) = max_length_of(&config.schema) {
                    if *min > max {
                        errors.push(format!(
                            "Schema rule '{}': min_length {} exceeds max_length {}.",
                            rule.name, min, max
                        ));
                    }
                }
            }
            SchemaCheck::MaxLength { .. } | SchemaCheck::Required => {}
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Config validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

fn max_length_of(rules: &[SchemaRule]) -> Option<usize> {
    rules
        .iter()
        .filter_map(|rule| match rule.check {
            SchemaCheck::MaxLength { max } => Some(max),
            _ => None,
        })
        .min()
}
