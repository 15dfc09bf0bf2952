//! Fenced-region discovery.
//!
//! A fenced region opens with three backticks immediately followed by a
//! configured language tag at the start of a line, and runs through the next
//! three backticks. Regions never overlap and are reported left to right; an
//! opener without a closer is ordinary text.
//!
//! Both the sanitizer (to shield regions from the markup stripper) and the
//! normalizer (to decode entities inside regions) go through the same
//! `FenceMatcher`, so they always agree on what a region is.

pub mod compiler;

use regex::{Captures, Regex};

/// The fence delimiter shared by openers and closers.
pub const FENCE_TOKEN: &str = "```";

/// A single fenced region found in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedRegion<'a> {
    /// Byte offset of the opening fence.
    pub start: usize,
    /// Byte offset just past the closing fence.
    pub end: usize,
    /// The language tag that opened the region.
    pub language: &'a str,
    /// Everything between the language tag and the closing fence.
    pub body: &'a str,
    /// The full region, delimiters included.
    pub text: &'a str,
}

/// Compiled recogniser for every configured fence language.
///
/// Build one through [`compiler::get_or_compile_fences`].
#[derive(Debug)]
pub struct FenceMatcher {
    pub(crate) regex: Option<Regex>,
    pub(crate) languages: Vec<String>,
}

impl FenceMatcher {
    /// The language tags this matcher recognises, duplicates removed.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Returns every fenced region in `text`, in order of appearance.
    pub fn find_regions<'a>(&self, text: &'a str) -> Vec<FencedRegion<'a>> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        regex.captures_iter(text).filter_map(|caps| region_from_captures(&caps)).collect()
    }

    /// Returns `true` if `text` contains at least one fenced region.
    pub fn has_regions(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(text))
    }

    /// The trimmed body of each region, as handed to a diagram renderer.
    /// Regions whose body is only whitespace are skipped.
    pub fn diagram_sources<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.find_regions(text)
            .into_iter()
            .map(|region| region.body.trim())
            .filter(|body| !body.is_empty())
            .collect()
    }

    /// Rewrites the body of every region through `f`.
    ///
    /// Delimiters, language tags and all text outside regions are copied
    /// through unchanged.
    pub fn map_bodies<F>(&self, text: &str, mut f: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let Some(regex) = &self.regex else {
            return text.to_string();
        };
        regex
            .replace_all(text, |caps: &Captures| {
                let language = caps.get(1).map_or("", |m| m.as_str());
                let body = caps.get(2).map_or("", |m| m.as_str());
                format!("{FENCE_TOKEN}{language}{}{FENCE_TOKEN}", f(body))
            })
            .into_owned()
    }
}

fn region_from_captures<'a>(caps: &Captures<'a>) -> Option<FencedRegion<'a>> {
    let whole = caps.get(0)?;
    Some(FencedRegion {
        start: whole.start(),
        end: whole.end(),
        language: caps.get(1)?.as_str(),
        body: caps.get(2)?.as_str(),
        text: whole.as_str(),
    })
}

/// Turns a language tag into the upper-case label used in placeholders.
pub fn placeholder_label(language: &str) -> String {
    language
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
