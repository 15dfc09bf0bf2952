// fencekeep-core/src/normalizer.rs
//! The content normalizer.
//!
//! Sits between the rich-text editor and the sanitizer. It repairs two known
//! editor artifacts (an encoded space left at the end of lines, and entity
//! encoded `<`, `>`, `&` inside diagram fences), then decides whether the
//! candidate text is accepted:
//!
//! * if sanitizing it changes it, it contained markup and is rejected with a
//!   fixed message;
//! * otherwise an optional schema validator gets the final say.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::config::{FencekeepConfig, NormalizerConfig};
use crate::errors::FencekeepError;
use crate::sanitizer::BlockPreservingSanitizer;
use crate::validators::{SchemaValidator, ValidationError};

/// Entities the editor introduces inside fences, in decoding order.
const FENCE_ENTITIES: [(&str, &str); 3] = [("&lt;", "<"), ("&gt;", ">"), ("&amp;", "&")];

/// Whether a call is an ordinary edit or the editor's initial normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Normal edit: repair, sanitize-check and validate.
    #[default]
    Edit,
    /// The editor re-emitting already validated content on load. Nothing is
    /// examined and nothing is accepted.
    InitialLoad,
}

/// Result of normalizing one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentReport {
    /// The repaired and decoded text (the raw text when bypassed).
    pub normalized_text: String,
    /// `true` when markup was found outside fenced regions.
    pub is_disallowed_markup: bool,
    /// Why the text was rejected, if it was.
    pub error: Option<ValidationError>,
    accepted: bool,
    bypassed: bool,
}

impl ContentReport {
    fn bypassed(raw: &str) -> Self {
        Self {
            normalized_text: raw.to_string(),
            is_disallowed_markup: false,
            error: None,
            accepted: false,
            bypassed: true,
        }
    }

    fn rejected(normalized_text: String, error: ValidationError) -> Self {
        Self {
            normalized_text,
            is_disallowed_markup: error.is_disallowed_markup(),
            error: Some(error),
            accepted: false,
            bypassed: false,
        }
    }

    fn accepted(normalized_text: String) -> Self {
        Self {
            normalized_text,
            is_disallowed_markup: false,
            error: None,
            accepted: true,
            bypassed: false,
        }
    }

    /// The value to propagate upward, present only when the text was accepted.
    pub fn accepted_value(&self) -> Option<&str> {
        self.accepted.then_some(self.normalized_text.as_str())
    }

    /// Error text for display; empty when there is no error.
    pub fn error_text(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}

/// Strips one trailing `escape` from each `\n`-separated line.
///
/// On a CRLF line the escape sits before the `\r`, which is kept.
pub fn repair_trailing_escapes(text: &str, escape: &str) -> String {
    if escape.is_empty() {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| {
            let (body, cr) = match line.strip_suffix('\r') {
                Some(body) => (body, "\r"),
                None => (line, ""),
            };
            match body.strip_suffix(escape) {
                Some(kept) => format!("{kept}{cr}"),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Folds CRLF and lone CR into LF, as the HTML parser does on input.
fn fold_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decodes `&lt;`, `&gt;` and `&amp;` in a fence body.
pub fn decode_fence_entities(body: &str) -> String {
    FENCE_ENTITIES
        .iter()
        .fold(body.to_string(), |acc, &(entity, literal)| acc.replace(entity, literal))
}

/// Repairs editor artifacts and checks candidate text.
#[derive(Debug)]
pub struct ContentNormalizer {
    sanitizer: BlockPreservingSanitizer,
    config: NormalizerConfig,
}

impl ContentNormalizer {
    pub fn new(config: &FencekeepConfig) -> Result<Self, FencekeepError> {
        Ok(Self::from_parts(BlockPreservingSanitizer::new(config)?, config.normalizer.clone()))
    }

    pub fn from_parts(sanitizer: BlockPreservingSanitizer, config: NormalizerConfig) -> Self {
        Self { sanitizer, config }
    }

    /// Entity-decodes the inside of every fenced region; text outside fences
    /// is left alone.
    pub fn decode_fenced_entities(&self, text: &str) -> String {
        self.sanitizer.fences().map_bodies(text, decode_fence_entities)
    }

    /// Applies both editor workarounds without validating.
    pub fn prepare(&self, raw: &str) -> String {
        let repaired = repair_trailing_escapes(raw, &self.config.trailing_escape);
        self.decode_fenced_entities(&repaired)
    }

    /// Normalizes and checks one candidate value.
    pub fn normalize(
        &self,
        raw: &str,
        validator: Option<&dyn SchemaValidator>,
        mode: NormalizeMode,
    ) -> ContentReport {
        if mode == NormalizeMode::InitialLoad {
            debug!("Initial normalization pass; skipping validation.");
            return ContentReport::bypassed(raw);
        }

        let decoded = self.prepare(raw);
        let sanitized = self.sanitizer.sanitize(&decoded);
        // Line endings are not markup; the accepted value keeps the author's.
        if fold_line_endings(&sanitized) != fold_line_endings(&decoded) {
            debug!("Sanitization changed the content; rejecting as disallowed markup.");
            return ContentReport::rejected(
                decoded,
                ValidationError::DisallowedMarkup(self.config.disallowed_markup_message.clone()),
            );
        }

        if let Some(validator) = validator {
            if let Err(issues) = validator.validate(&decoded) {
                debug!("Schema validation reported {} issue(s).", issues.len());
                return ContentReport::rejected(decoded, ValidationError::Schema(issues));
            }
        }

        ContentReport::accepted(decoded)
    }
}
