// fencekeep-core/src/field.rs
//! Caller-side state for a single editable content field.
//!
//! The transforms themselves are stateless. An input component still needs
//! somewhere to keep the text being edited, the error shown next to it, and a
//! hook to hand accepted values upward; `ContentField` holds exactly that.

use log::debug;

use crate::normalizer::{ContentNormalizer, ContentReport, NormalizeMode};
use crate::validators::SchemaValidator;

type ChangeCallback<'a> = Box<dyn FnMut(&str) + 'a>;

/// Current value and error slots for one field, plus its change callback.
pub struct ContentField<'a> {
    normalizer: &'a ContentNormalizer,
    validator: Option<Box<dyn SchemaValidator + 'a>>,
    on_change: Option<ChangeCallback<'a>>,
    temp_value: String,
    error_text: String,
}

impl<'a> ContentField<'a> {
    pub fn new(normalizer: &'a ContentNormalizer, value: impl Into<String>) -> Self {
        Self {
            normalizer,
            validator: None,
            on_change: None,
            temp_value: value.into(),
            error_text: String::new(),
        }
    }

    pub fn with_validator(mut self, validator: impl SchemaValidator + 'a) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Registers the callback that receives accepted values.
    pub fn on_change(mut self, callback: impl FnMut(&str) + 'a) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// The text currently shown in the field, accepted or not.
    pub fn temp_value(&self) -> &str {
        &self.temp_value
    }

    /// The error shown next to the field; empty when there is none.
    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// Applies a value pushed in from outside (e.g. a reload).
    ///
    /// An empty value also clears any displayed error.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.temp_value = value.into();
        if self.temp_value.is_empty() {
            self.error_text.clear();
        }
    }

    /// Handles one edit from the editor.
    ///
    /// With `initial` set the edit is the editor's own load-time normalization
    /// and is ignored entirely.
    pub fn handle_change(&mut self, raw: &str, initial: bool) -> ContentReport {
        let mode = if initial { NormalizeMode::InitialLoad } else { NormalizeMode::Edit };
        let report = self.normalizer.normalize(raw, self.validator.as_deref(), mode);
        if report.is_bypassed() {
            return report;
        }

        self.temp_value.clone_from(&report.normalized_text);
        self.error_text = report.error_text();

        if let Some(value) = report.accepted_value() {
            if let Some(callback) = self.on_change.as_mut() {
                debug!("Propagating accepted value ({} bytes).", value.len());
                callback(value);
            }
        }
        report
    }
}

impl std::fmt::Debug for ContentField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentField")
            .field("temp_value", &self.temp_value)
            .field("error_text", &self.error_text)
            .field("has_validator", &self.validator.is_some())
            .field("has_on_change", &self.on_change.is_some())
            .finish()
    }
}
