//! errors.rs - Custom error types for the fencekeep-core library.
//!
//! Validation outcomes (disallowed markup, schema issues) are plain values in
//! `validators`; this enum only covers failures of the plumbing around them.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All fallible-operation errors produced by `fencekeep-core`.
///
/// New variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FencekeepError {
    #[error("Invalid fence language tag '{0}': {1}")]
    InvalidLanguageTag(String, &'static str),

    #[error("Failed to compile fence matcher for languages [{0}]: {1}")]
    FenceCompilation(String, regex::Error),

    #[error("Schema rule '{0}' has an invalid pattern: {1}")]
    InvalidSchemaPattern(String, regex::Error),

    #[error("Content nesting exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),

    #[error("Invalid JSON content: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
