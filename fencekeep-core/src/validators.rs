// File: fencekeep-core/src/validators.rs
//! Validation outcomes and caller-supplied schema validation.
//!
//! Rejections are values, not errors: the normalizer reports a
//! [`ValidationError`] alongside the candidate text and the caller decides what
//! to display. Schema validation is pluggable through [`SchemaValidator`];
//! closures work directly and [`RuleValidator`] covers the common checks that
//! can be declared in configuration.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FencekeepError;

/// Separator between issue messages in a schema rejection.
pub const ISSUE_SEPARATOR: &str = "; ";

/// A single problem reported by a schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    /// Name of the rule that produced the issue, when known.
    #[serde(default)]
    pub rule: Option<String>,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), rule: None }
    }

    pub fn for_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self { message: message.into(), rule: Some(rule.into()) }
    }
}

/// Why a candidate value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Markup was found outside fenced regions. Carries the fixed message.
    DisallowedMarkup(String),
    /// The schema validator rejected the text.
    Schema(Vec<ValidationIssue>),
}

impl ValidationError {
    pub fn is_disallowed_markup(&self) -> bool {
        matches!(self, ValidationError::DisallowedMarkup(_))
    }

    /// The issues behind a schema rejection; empty for markup rejections.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ValidationError::Schema(issues) => issues,
            ValidationError::DisallowedMarkup(_) => &[],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DisallowedMarkup(message) => f.write_str(message),
            ValidationError::Schema(issues) => {
                let joined = issues
                    .iter()
                    .map(|issue| issue.message.as_str())
                    .collect::<Vec<_>>()
                    .join(ISSUE_SEPARATOR);
                f.write_str(&joined)
            }
        }
    }
}

/// Caller-supplied validation of normalized text.
pub trait SchemaValidator {
    /// Returns every issue found, in the order they should be reported.
    fn validate(&self, value: &str) -> Result<(), Vec<ValidationIssue>>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&str) -> Result<(), Vec<ValidationIssue>>,
{
    fn validate(&self, value: &str) -> Result<(), Vec<ValidationIssue>> {
        self(value)
    }
}

/// A declarative check, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaCheck {
    /// At most `max` characters.
    MaxLength { max: usize },
    /// At least `min` characters.
    MinLength { min: usize },
    /// Not empty after trimming whitespace.
    Required,
    /// Must match the regular expression somewhere in the text.
    Pattern { pattern: String },
}

/// A named schema rule with an optional custom message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRule {
    pub name: String,
    #[serde(flatten)]
    pub check: SchemaCheck,
    #[serde(default)]
    pub message: Option<String>,
}

impl SchemaRule {
    fn default_message(&self) -> String {
        match &self.check {
            SchemaCheck::MaxLength { max } => format!("Must be at most {} characters", max),
            SchemaCheck::MinLength { min } => format!("Must be at least {} characters", min),
            SchemaCheck::Required => "Required".to_string(),
            SchemaCheck::Pattern { pattern } => format!("Must match pattern {}", pattern),
        }
    }
}

#[derive(Debug)]
enum CompiledCheck {
    MaxLength(usize),
    MinLength(usize),
    Required,
    Pattern(Regex),
}

#[derive(Debug)]
struct CompiledSchemaRule {
    name: String,
    check: CompiledCheck,
    message: String,
}

impl CompiledSchemaRule {
    fn passes(&self, value: &str) -> bool {
        match &self.check {
            // Lengths count characters, not bytes.
            CompiledCheck::MaxLength(max) => value.chars().count() <= *max,
            CompiledCheck::MinLength(min) => value.chars().count() >= *min,
            CompiledCheck::Required => !value.trim().is_empty(),
            CompiledCheck::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// Validator built from configured [`SchemaRule`]s.
///
/// Every failing rule is reported, in declaration order.
#[derive(Debug, Default)]
pub struct RuleValidator {
    rules: Vec<CompiledSchemaRule>,
}

impl RuleValidator {
    pub fn compile(rules: &[SchemaRule]) -> Result<Self, FencekeepError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let check = match &rule.check {
                SchemaCheck::MaxLength { max } => CompiledCheck::MaxLength(*max),
                SchemaCheck::MinLength { min } => CompiledCheck::MinLength(*min),
                SchemaCheck::Required => CompiledCheck::Required,
                SchemaCheck::Pattern { pattern } => CompiledCheck::Pattern(
                    Regex::new(pattern)
                        .map_err(|e| FencekeepError::InvalidSchemaPattern(rule.name.clone(), e))?,
                ),
            };
            compiled.push(CompiledSchemaRule {
                name: rule.name.clone(),
                check,
                message: rule.message.clone().unwrap_or_else(|| rule.default_message()),
            });
        }
        Ok(Self { rules: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl SchemaValidator for RuleValidator {
    fn validate(&self, value: &str) -> Result<(), Vec<ValidationIssue>> {
        let issues: Vec<ValidationIssue> = self
            .rules
            .iter()
            .filter(|rule| !rule.passes(value))
            .map(|rule| ValidationIssue::for_rule(rule.name.as_str(), rule.message.as_str()))
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, check: SchemaCheck) -> SchemaRule {
        SchemaRule { name: name.to_string(), check, message: None }
    }

    #[test]
    fn test_schema_error_joins_messages_in_order() {
        let err = ValidationError::Schema(vec![
            ValidationIssue::new("too long"),
            ValidationIssue::new("must mention a threat"),
        ]);
        assert_eq!(err.to_string(), "too long; must mention a threat");
        assert!(!err.is_disallowed_markup());
    }

    #[test]
    fn test_rule_validator_reports_every_failing_rule() {
        let validator = RuleValidator::compile(&[
            rule("short", SchemaCheck::MaxLength { max: 3 }),
            rule("digits", SchemaCheck::Pattern { pattern: r"\d".to_string() }),
            rule("present", SchemaCheck::Required),
        ])
        .unwrap();
        assert_eq!(validator.len(), 3);
        assert!(!validator.is_empty());
        assert!(RuleValidator::compile(&[]).unwrap().is_empty());

        let issues = validator.validate("abcd").unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].rule.as_deref(), Some("short"));
        assert_eq!(issues[0].message, "Must be at most 3 characters");
        assert_eq!(issues[1].rule.as_deref(), Some("digits"));
        assert!(validator.validate("a1").is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        let validator = RuleValidator::compile(&[rule("short", SchemaCheck::MaxLength { max: 2 })]).unwrap();
        assert!(validator.validate("éé").is_ok());
    }

    #[test]
    fn test_custom_message_wins() {
        let mut r = rule("present", SchemaCheck::Required);
        r.message = Some("Please describe the threat".to_string());
        let validator = RuleValidator::compile(&[r]).unwrap();
        assert_eq!(validator.validate("  ").unwrap_err()[0].message, "Please describe the threat");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = RuleValidator::compile(&[rule("bad", SchemaCheck::Pattern { pattern: "(".to_string() })]);
        assert!(matches!(err, Err(FencekeepError::InvalidSchemaPattern(name, _)) if name == "bad"));
    }

    #[test]
    fn test_closures_are_validators() {
        let validator = |value: &str| {
            if value.contains("forbidden") {
                Err(vec![ValidationIssue::new("no forbidden words")])
            } else {
                Ok(())
            }
        };
        assert!(validator.validate("fine").is_ok());
        assert!(SchemaValidator::validate(&validator, "forbidden").is_err());
    }
}
