// fencekeep-core/tests/normalizer_tests.rs
//! End-to-end tests for the content normalizer: editor workarounds, markup
//! rejection, schema validation and the initial-load bypass.

use anyhow::Result;
use test_log::test;

use fencekeep_core::{
    ContentNormalizer, FencekeepConfig, NormalizeMode, RuleValidator, SchemaCheck, SchemaRule,
    SchemaValidator, ValidationError, ValidationIssue,
};

fn normalizer() -> Result<ContentNormalizer> {
    Ok(ContentNormalizer::new(&FencekeepConfig::load_default()?)?)
}

#[test]
fn test_entity_decoding_is_scoped_to_fences() -> Result<()> {
    let n = normalizer()?;
    let raw = "x &gt; y\n```mermaid\ngraph LR\nA --&gt; B\n```";
    let decoded = n.prepare(raw);
    assert_eq!(decoded, "x &gt; y\n```mermaid\ngraph LR\nA --> B\n```");
    Ok(())
}

#[test]
fn test_encoded_diagram_is_accepted_decoded() -> Result<()> {
    let n = normalizer()?;
    let raw = "Data flow:&#x20;\n```mermaid\ngraph LR\nA --&gt; B &amp; C\nB -.-&gt; D\n```";
    let report = n.normalize(raw, None, NormalizeMode::Edit);
    assert!(!report.is_disallowed_markup);
    assert_eq!(
        report.accepted_value(),
        Some("Data flow:\n```mermaid\ngraph LR\nA --> B & C\nB -.-> D\n```")
    );
    assert_eq!(report.error_text(), "");
    Ok(())
}

#[test]
fn test_trailing_escape_repair_changes_nothing_else() -> Result<()> {
    let n = normalizer()?;
    let report = n.normalize("one&#x20;\ntwo\n  three  &#x20;", None, NormalizeMode::Edit);
    assert_eq!(report.normalized_text, "one\ntwo\n  three  ");
    assert!(report.accepted_value().is_some());
    Ok(())
}

#[test]
fn test_disallowed_markup_is_rejected() -> Result<()> {
    let n = normalizer()?;
    let report = n.normalize("hello <script>alert(1)</script>", None, NormalizeMode::Edit);
    assert!(report.is_disallowed_markup);
    assert_eq!(report.error_text(), "Html tags not supported");
    assert_eq!(report.accepted_value(), None);
    assert!(matches!(report.error, Some(ValidationError::DisallowedMarkup(_))));
    Ok(())
}

#[test]
fn test_markup_check_short_circuits_schema() -> Result<()> {
    let n = normalizer()?;
    let never_called = |_: &str| -> Result<(), Vec<ValidationIssue>> {
        panic!("schema validation must not run after a markup rejection")
    };
    let report = n.normalize("<b>x</b>", Some(&never_called), NormalizeMode::Edit);
    assert!(report.is_disallowed_markup);
    Ok(())
}

#[test]
fn test_schema_rejection_joins_issues() -> Result<()> {
    const LIMIT: usize = 10;
    let n = normalizer()?;
    let validator = RuleValidator::compile(&[
        SchemaRule {
            name: "max".to_string(),
            check: SchemaCheck::MaxLength { max: LIMIT },
            message: Some(format!("Must be {LIMIT} characters or fewer")),
        },
        SchemaRule {
            name: "no_digits".to_string(),
            check: SchemaCheck::Pattern { pattern: r"^\D*$".to_string() },
            message: Some("Digits are not allowed".to_string()),
        },
    ])?;

    let input = "a".repeat(LIMIT + 1);
    let report = n.normalize(&input, Some(&validator), NormalizeMode::Edit);
    assert!(!report.is_disallowed_markup);
    assert_eq!(report.error_text(), "Must be 10 characters or fewer");
    assert_eq!(report.accepted_value(), None);

    let report = n.normalize("12345678901", Some(&validator), NormalizeMode::Edit);
    assert_eq!(report.error_text(), "Must be 10 characters or fewer; Digits are not allowed");
    assert_eq!(report.error.as_ref().map(|e| e.issues().len()), Some(2));

    let report = n.normalize("short", Some(&validator), NormalizeMode::Edit);
    assert_eq!(report.accepted_value(), Some("short"));
    Ok(())
}

#[test]
fn test_validator_sees_decoded_text() -> Result<()> {
    let n = normalizer()?;
    let wants_arrow = |value: &str| -> Result<(), Vec<ValidationIssue>> {
        if value.contains("-->") {
            Ok(())
        } else {
            Err(vec![ValidationIssue::new("diagram has no edges")])
        }
    };
    let validator: &dyn SchemaValidator = &wants_arrow;
    let report = n.normalize("```mermaid\nA --&gt; B\n```", Some(validator), NormalizeMode::Edit);
    assert!(report.accepted_value().is_some());
    Ok(())
}

#[test]
fn test_initial_load_bypass() -> Result<()> {
    let n = normalizer()?;
    let raw = "<b>stored</b>&#x20;\n```mermaid\nA --&gt; B\n```";
    let report = n.normalize(raw, None, NormalizeMode::InitialLoad);
    assert!(report.is_bypassed());
    assert_eq!(report.normalized_text, raw);
    assert!(!report.is_disallowed_markup);
    assert!(report.error.is_none());
    Ok(())
}

#[test]
fn test_custom_disallowed_message() -> Result<()> {
    let mut config = FencekeepConfig::default();
    config.normalizer.disallowed_markup_message = "No HTML, please".to_string();
    let n = ContentNormalizer::new(&config)?;
    let report = n.normalize("<i>x</i>", None, NormalizeMode::Edit);
    assert_eq!(report.error_text(), "No HTML, please");
    Ok(())
}

#[test]
fn test_plain_ampersand_counts_as_markup_change() -> Result<()> {
    // The stripper escapes `&` outside fences, so the text no longer matches.
    let n = normalizer()?;
    let report = n.normalize("salt & pepper", None, NormalizeMode::Edit);
    assert!(report.is_disallowed_markup);
    Ok(())
}
