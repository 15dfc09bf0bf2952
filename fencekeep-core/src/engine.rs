// fencekeep-core/src/engine.rs
//! Defines the `MarkupStripper` trait: the seam to the general-purpose HTML
//! sanitizer.
//!
//! The block-preserving sanitizer never parses HTML itself. It hands the
//! carrier string (fenced regions already replaced by placeholders) to a
//! stripper and treats it as a black box whose policy is "no tags allowed".
//!
//! License: MIT OR APACHE 2.0

/// A general-purpose HTML sanitizer running a strip-all-tags policy.
///
/// Implementations must remove every tag, keep text content, and escape
/// characters that would otherwise read as markup. They must be pure: the same
/// input always yields the same output.
pub trait MarkupStripper: Send + Sync {
    /// Removes all markup from `content`.
    fn strip_markup(&self, content: &str) -> String;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}
