// fencekeep-core/src/engines/ammonia_engine.rs
//! A `MarkupStripper` backed by `ammonia`, configured to allow no tags at all.
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use crate::engine::MarkupStripper;

/// Strips every HTML tag with `ammonia`.
///
/// Text content survives, `<`, `>` and `&` in text come back entity-escaped,
/// comments are dropped, and the contents of `script` and `style` elements
/// are removed along with the tags.
pub struct AmmoniaStripper {
    cleaner: ammonia::Builder<'static>,
}

impl AmmoniaStripper {
    /// Builds a stripper with an empty tag allowlist and comment stripping.
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner.tags(HashSet::new()).strip_comments(true);
        Self { cleaner }
    }
}

impl Default for AmmoniaStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AmmoniaStripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmmoniaStripper").finish_non_exhaustive()
    }
}

impl MarkupStripper for AmmoniaStripper {
    fn strip_markup(&self, content: &str) -> String {
        self.cleaner.clean(content).to_string()
    }

    fn name(&self) -> &'static str {
        "ammonia"
    }
}
