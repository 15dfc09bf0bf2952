// fencekeep-core/src/lib.rs
//! # fencekeep Core Library
//!
//! `fencekeep-core` keeps user-authored markdown free of HTML while passing
//! fenced diagram blocks (```` ```mermaid ````) through byte-for-byte. Diagram
//! syntax uses `<` and `>` as arrows, so a plain HTML sanitizer would mangle
//! it; here fenced regions are swapped for placeholders, the rest is stripped,
//! and the regions are put back by position.
//!
//! The library is pure and stateless apart from a cache of compiled fence
//! matchers.
//!
//! ## Modules
//!
//! * `config`: `FencekeepConfig`, loaded from YAML, with an embedded default.
//! * `fences`: finds fenced regions and compiles/caches their matcher.
//! * `engine`: the `MarkupStripper` trait, the seam to the HTML sanitizer.
//! * `engines`: `AmmoniaStripper`, the strip-all-tags implementation.
//! * `sanitizer`: `BlockPreservingSanitizer` for strings and structured content.
//! * `normalizer`: repairs editor artifacts and decides acceptance.
//! * `validators`: rejection values and pluggable schema validation.
//! * `field`: value/error slots for an editable field.
//! * `headless`: one-shot wrappers.
//! * `errors`: `FencekeepError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use fencekeep_core::{BlockPreservingSanitizer, ContentNormalizer, FencekeepConfig, NormalizeMode};
//!
//! let config = FencekeepConfig::load_default().unwrap();
//! let sanitizer = BlockPreservingSanitizer::new(&config).unwrap();
//!
//! let input = "<b>Flow</b>\n```mermaid\nA --> B\n```";
//! assert_eq!(sanitizer.sanitize(input), "Flow\n```mermaid\nA --> B\n```");
//!
//! let normalizer = ContentNormalizer::new(&config).unwrap();
//! let report = normalizer.normalize("hello <script>alert(1)</script>", None, NormalizeMode::Edit);
//! assert!(report.is_disallowed_markup);
//! assert_eq!(report.error_text(), "Html tags not supported");
//! ```
//!
//! ## Error Handling
//!
//! Rejected content is reported as a `ValidationError` value inside a
//! `ContentReport`. `FencekeepError` and `anyhow::Error` are reserved for
//! configuration problems and structured content nested too deeply.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod fences;
pub mod field;
pub mod headless;
pub mod normalizer;
pub mod sanitizer;
pub mod validators;

/// Re-exports the configuration types and helpers.
pub use config::{
    merge_config,
    validate_config,
    FenceConfig,
    FencekeepConfig,
    NormalizerConfig,
    SanitizerConfig,
    DISALLOWED_MARKUP_MESSAGE,
};

pub use errors::FencekeepError;

pub use engine::MarkupStripper;
pub use engines::ammonia_engine::AmmoniaStripper;

pub use fences::compiler::{compile_fence_matcher, get_or_compile_fences};
pub use fences::{FenceMatcher, FencedRegion};

pub use sanitizer::BlockPreservingSanitizer;
pub use normalizer::{ContentNormalizer, ContentReport, NormalizeMode};
pub use validators::{
    RuleValidator,
    SchemaCheck,
    SchemaRule,
    SchemaValidator,
    ValidationError,
    ValidationIssue,
};
pub use field::ContentField;

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{headless_normalize, headless_sanitize_string, headless_sanitize_value};
