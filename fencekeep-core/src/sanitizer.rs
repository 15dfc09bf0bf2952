// fencekeep-core/src/sanitizer.rs
//! The block-preserving sanitizer.
//!
//! Diagram syntax uses `<` and `>` as arrows, so fenced regions cannot go
//! through the markup stripper. Instead the sanitizer works in two passes:
//!
//! 1. every fenced region is swapped for a placeholder and its original text
//!    is recorded at the placeholder's discovery index;
//! 2. the carrier string is stripped, then placeholders are restored in a
//!    single forward scan, each one only in its discovery position.
//!
//! Placeholders look like `__MERMAID_BLOCK_0__`. If the prefix occurs in the
//! input, or the stripper could produce it (an entity such as `&#95;`, or a
//! tag splitting the word), a salt is added (`__MERMAID_BLOCK_S1_0__`). After
//! stripping, the carrier must hold nothing but our own placeholders, in
//! discovery order; otherwise the next salt is tried.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::FencekeepConfig;
use crate::engine::MarkupStripper;
use crate::engines::ammonia_engine::AmmoniaStripper;
use crate::errors::FencekeepError;
use crate::fences::compiler::get_or_compile_fences;
use crate::fences::{placeholder_label, FenceMatcher, FencedRegion};

/// Salts tried before fenced regions are given up on and stripped as text.
const MAX_PLACEHOLDER_SALTS: usize = 32;

/// A fenced region pulled out of the input, keyed by its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExtractedBlock {
    prefix: String,
    placeholder: String,
    original: String,
}

/// The input with every fenced region replaced by a placeholder.
#[derive(Debug)]
struct Carrier {
    text: String,
    blocks: Vec<ExtractedBlock>,
}

/// Strips markup outside fenced regions and returns the regions untouched.
pub struct BlockPreservingSanitizer {
    fences: Arc<FenceMatcher>,
    stripper: Box<dyn MarkupStripper>,
    max_depth: usize,
}

impl std::fmt::Debug for BlockPreservingSanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockPreservingSanitizer")
            .field("languages", &self.fences.languages())
            .field("stripper", &self.stripper.name())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl BlockPreservingSanitizer {
    /// Builds a sanitizer with the `ammonia` stripper.
    pub fn new(config: &FencekeepConfig) -> Result<Self, FencekeepError> {
        Self::with_stripper(config, Box::new(AmmoniaStripper::new()))
    }

    /// Builds a sanitizer around a custom markup stripper.
    pub fn with_stripper(
        config: &FencekeepConfig,
        stripper: Box<dyn MarkupStripper>,
    ) -> Result<Self, FencekeepError> {
        let fences = get_or_compile_fences(&config.fences)?;
        debug!(
            "Sanitizer ready: stripper '{}', fences [{}], max depth {}.",
            stripper.name(),
            fences.languages().join(", "),
            config.sanitizer.max_depth
        );
        Ok(Self { fences, stripper, max_depth: config.sanitizer.max_depth })
    }

    /// The fence matcher shared with the normalizer.
    pub fn fences(&self) -> &FenceMatcher {
        &self.fences
    }

    /// Sanitizes a string. Never fails.
    pub fn sanitize(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }

        let regions = self.fences.find_regions(input);
        if regions.is_empty() {
            return self.stripper.strip_markup(input);
        }

        // A prefix the author can produce shows up in the stripped input.
        let stripped_input = self.stripper.strip_markup(input);
        for salt in 0..MAX_PLACEHOLDER_SALTS {
            let usable = regions.iter().all(|region| {
                let prefix = placeholder_prefix(region.language, salt);
                !input.contains(&prefix) && !stripped_input.contains(&prefix)
            });
            if !usable {
                continue;
            }

            let carrier = build_carrier(input, &regions, salt);
            let stripped = self.stripper.strip_markup(&carrier.text);
            if placeholders_in_order(&stripped, &carrier.blocks) {
                debug!("Extracted {} fenced block(s) with placeholder salt {}.", carrier.blocks.len(), salt);
                return restore_blocks(&stripped, &carrier.blocks);
            }
            debug!("Placeholder salt {} collided with stripped content; retrying.", salt);
        }

        warn!("No collision-free placeholder found; fenced blocks are sanitized as plain text.");
        stripped_input
    }

    /// Sanitizes structured content.
    ///
    /// Strings are sanitized, sequences element-wise, mappings value-wise with
    /// keys unchanged; null, booleans and numbers pass through. Nesting deeper
    /// than the configured limit is an error rather than a pass-through.
    pub fn sanitize_value(&self, value: &Value) -> Result<Value, FencekeepError> {
        self.sanitize_value_at(value, 0)
    }

    /// Parses a JSON document, sanitizes it structurally and serializes it back
    /// (pretty-printed).
    pub fn sanitize_json(&self, document: &str) -> Result<String, FencekeepError> {
        let value: Value = serde_json::from_str(document)?;
        let sanitized = self.sanitize_value(&value)?;
        Ok(serde_json::to_string_pretty(&sanitized)?)
    }

    fn sanitize_value_at(&self, value: &Value, depth: usize) -> Result<Value, FencekeepError> {
        match value {
            Value::String(text) => Ok(Value::String(self.sanitize(text))),
            Value::Array(items) => {
                self.enter_container(depth)?;
                items
                    .iter()
                    .map(|item| self.sanitize_value_at(item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Value::Object(entries) => {
                self.enter_container(depth)?;
                let mut sanitized = Map::with_capacity(entries.len());
                for (key, item) in entries {
                    sanitized.insert(key.clone(), self.sanitize_value_at(item, depth + 1)?);
                }
                Ok(Value::Object(sanitized))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        }
    }

    fn enter_container(&self, depth: usize) -> Result<(), FencekeepError> {
        if depth >= self.max_depth {
            warn!("Refusing to sanitize content nested deeper than {} levels.", self.max_depth);
            return Err(FencekeepError::DepthLimitExceeded(self.max_depth));
        }
        Ok(())
    }
}

/// Replaces every region with its placeholder, numbered in discovery order.
fn build_carrier(input: &str, regions: &[FencedRegion<'_>], salt: usize) -> Carrier {
    let mut text = String::with_capacity(input.len());
    let mut blocks = Vec::with_capacity(regions.len());
    let mut last_end = 0usize;
    for (index, region) in regions.iter().enumerate() {
        let prefix = placeholder_prefix(region.language, salt);
        let placeholder = format!("{}{}__", prefix, index);
        text.push_str(&input[last_end..region.start]);
        text.push_str(&placeholder);
        blocks.push(ExtractedBlock { prefix, placeholder, original: region.text.to_string() });
        last_end = region.end;
    }
    text.push_str(&input[last_end..]);
    Carrier { text, blocks }
}

/// The placeholder prefix for `language`; salt `0` is unsalted.
fn placeholder_prefix(language: &str, salt: usize) -> String {
    let label = placeholder_label(language);
    if salt == 0 {
        format!("__{}_BLOCK_", label)
    } else {
        format!("__{}_BLOCK_S{}_", label, salt)
    }
}

/// Checks that every prefix occurrence in `stripped` starts one of our
/// placeholders, and that they appear in discovery order. Placeholders the
/// stripper removed may be missing.
fn placeholders_in_order(stripped: &str, blocks: &[ExtractedBlock]) -> bool {
    let mut prefixes: Vec<&str> = blocks.iter().map(|b| b.prefix.as_str()).collect();
    prefixes.sort_unstable();
    prefixes.dedup();

    let mut found: Vec<usize> = prefixes
        .into_iter()
        .flat_map(|prefix| stripped.match_indices(prefix).map(|(at, _)| at))
        .collect();
    found.sort_unstable();

    let mut next = 0usize;
    let mut consumed_until = 0usize;
    for at in found {
        // Another language's prefix nested inside a placeholder already matched.
        if at < consumed_until {
            continue;
        }
        let rest = &stripped[at..];
        match blocks[next..].iter().position(|b| rest.starts_with(&b.placeholder)) {
            Some(offset) => {
                consumed_until = at + blocks[next + offset].placeholder.len();
                next += offset + 1;
            }
            None => return false,
        }
    }
    true
}

/// Puts the recorded blocks back, each at its own placeholder, in order.
///
/// The scan only moves forward, so block `i` can only land after block `i-1`.
/// A placeholder the stripper removed (e.g. inside a `<script>` element) is
/// skipped and its block is dropped.
fn restore_blocks(stripped: &str, blocks: &[ExtractedBlock]) -> String {
    let mut restored = String::with_capacity(
        stripped.len() + blocks.iter().map(|b| b.original.len()).sum::<usize>(),
    );
    let mut cursor = 0usize;
    for (index, block) in blocks.iter().enumerate() {
        match stripped[cursor..].find(&block.placeholder) {
            Some(offset) => {
                let at = cursor + offset;
                restored.push_str(&stripped[cursor..at]);
                restored.push_str(&block.original);
                cursor = at + block.placeholder.len();
            }
            None => warn!("Fenced block {} was removed by the markup stripper.", index),
        }
    }
    restored.push_str(&stripped[cursor..]);
    restored
}
