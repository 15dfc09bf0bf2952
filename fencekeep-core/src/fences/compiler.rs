//! compiler.rs - Manages the compilation and caching of fence matchers.
//!
//! A fence matcher is a single regular expression recognising every configured
//! fence language. Compiled matchers are kept in a global, shared cache keyed
//! by the language list so repeated sanitizer construction does not recompile.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::RegexBuilder;
use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};
use std::collections::{HashMap, HashSet};

use crate::config::FenceConfig;
use crate::errors::FencekeepError;
use crate::fences::{FenceMatcher, FENCE_TOKEN};

/// Maximum allowed length of a single fence language tag.
pub const MAX_LANGUAGE_TAG_LENGTH: usize = 32;

lazy_static! {
    /// A thread-safe, global cache for compiled fence matchers.
    static ref COMPILED_FENCES_CACHE: RwLock<HashMap<Vec<String>, Arc<FenceMatcher>>> = RwLock::new(HashMap::new());
}

/// Checks that a language tag can sit directly after the fence token.
///
/// Tags are restricted to ASCII alphanumerics plus `-`, `_` and `+` so they can
/// never contain whitespace, backticks or regex syntax.
pub fn validate_language_tag(tag: &str) -> Result<(), FencekeepError> {
    if tag.is_empty() {
        return Err(FencekeepError::InvalidLanguageTag(tag.to_string(), "tag is empty"));
    }
    if tag.len() > MAX_LANGUAGE_TAG_LENGTH {
        return Err(FencekeepError::InvalidLanguageTag(tag.to_string(), "tag is too long"));
    }
    if !tag.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')) {
        return Err(FencekeepError::InvalidLanguageTag(
            tag.to_string(),
            "only ASCII letters, digits, '-', '_' and '+' are allowed",
        ));
    }
    Ok(())
}

/// Compiles a `FenceMatcher` for the given languages.
///
/// Duplicate tags are collapsed; an empty list yields a matcher that never
/// finds a region.
pub fn compile_fence_matcher(languages: &[String]) -> Result<FenceMatcher, FencekeepError> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(languages.len());
    for tag in languages {
        validate_language_tag(tag)?;
        if seen.insert(tag.as_str()) {
            unique.push(tag.clone());
        }
    }

    if unique.is_empty() {
        debug!("No fence languages configured; fenced regions are disabled.");
        return Ok(FenceMatcher { regex: None, languages: unique });
    }

    // Longest tags first so `mermaid-beta` is not shadowed by `mermaid`.
    let mut alternatives: Vec<&String> = unique.iter().collect();
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = alternatives
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = format!("^{token}({alternation})(.*?){token}", token = FENCE_TOKEN);
    debug!("Compiling fence matcher with pattern '{}'", pattern);

    let regex = RegexBuilder::new(&pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|e| FencekeepError::FenceCompilation(unique.join(", "), e))?;

    log::debug!(
        target: "fencekeep_core::fences",
        "Fence matcher for [{}] compiled successfully.",
        unique.join(", ")
    );
    Ok(FenceMatcher { regex: Some(regex), languages: unique })
}

/// Gets a `FenceMatcher` from the cache or compiles it if not found.
pub fn get_or_compile_fences(config: &FenceConfig) -> Result<Arc<FenceMatcher>, FencekeepError> {
    let cache_key = config.languages.clone();

    {
        let cache = COMPILED_FENCES_CACHE
            .read()
            .map_err(|_| FencekeepError::Fatal("fence matcher cache lock poisoned".to_string()))?;
        if let Some(matcher) = cache.get(&cache_key) {
            debug!("Serving fence matcher from cache for [{}]", cache_key.join(", "));
            return Ok(Arc::clone(matcher));
        }
    }

    let compiled = Arc::new(compile_fence_matcher(&config.languages)?);

    COMPILED_FENCES_CACHE
        .write()
        .map_err(|_| FencekeepError::Fatal("fence matcher cache lock poisoned".to_string()))?
        .insert(cache_key, Arc::clone(&compiled));

    Ok(compiled)
}
