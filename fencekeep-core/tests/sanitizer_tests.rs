// fencekeep-core/tests/sanitizer_tests.rs
//! Behavioural tests for the block-preserving sanitizer.

use anyhow::Result;
use serde_json::json;
use test_log::test;

use fencekeep_core::{BlockPreservingSanitizer, FenceConfig, FencekeepConfig};

fn sanitizer() -> Result<BlockPreservingSanitizer> {
    Ok(BlockPreservingSanitizer::new(&FencekeepConfig::load_default()?)?)
}

const FLOW: &str = "```mermaid\ngraph TD\n  A[Start] --> B{Is it?}\n  B -->|Yes| C<br/>D\n  C -.-> E>Flag]\n```";

#[test]
fn test_strips_markup_and_keeps_text() -> Result<()> {
    let s = sanitizer()?;
    let out = s.sanitize("<b>x</b>");
    assert!(!out.contains("<b>"));
    assert_eq!(out, "x");
    Ok(())
}

#[test]
fn test_well_formed_blocks_round_trip() -> Result<()> {
    let s = sanitizer()?;
    let second = "```mermaid\nsequenceDiagram\n  Alice->>Bob: <hello> & bye\n```";
    let input = format!("{FLOW}\n{second}");
    assert_eq!(s.sanitize(&input), input);
    assert_eq!(s.sanitize(FLOW), FLOW);
    Ok(())
}

#[test]
fn test_markup_outside_blocks_is_stripped_inside_kept() -> Result<()> {
    let s = sanitizer()?;
    let input = format!("<p>Before</p>\n{FLOW}\n<img src=x onerror=alert(1)>After");
    let out = s.sanitize(&input);
    assert_eq!(out, format!("Before\n{FLOW}\nAfter"));
    Ok(())
}

#[test]
fn test_idempotent_without_fences() -> Result<()> {
    let s = sanitizer()?;
    for input in [
        "plain",
        "<b>bold</b> and <i>italic</i>",
        "a < b && c > d",
        "<script>alert(1)</script>tail",
        "",
    ] {
        let once = s.sanitize(input);
        assert_eq!(s.sanitize(&once), once, "not idempotent for {input:?}");
    }
    Ok(())
}

#[test]
fn test_unterminated_fence_is_plain_text() -> Result<()> {
    let s = sanitizer()?;
    let input = "```mermaid\nA --> B\n";
    let out = s.sanitize(input);
    assert!(out.starts_with("```mermaid\n"));
    assert!(out.contains("A --&gt; B"));
    Ok(())
}

#[test]
fn test_other_fence_languages_are_sanitized() -> Result<()> {
    let s = sanitizer()?;
    let out = s.sanitize("```html\n<b>x</b>\n```");
    assert_eq!(out, "```html\nx\n```");
    Ok(())
}

#[test]
fn test_existing_placeholder_text_does_not_capture_blocks() -> Result<()> {
    let s = sanitizer()?;
    let input = format!("literal __MERMAID_BLOCK_0__ here\n{FLOW}");
    let out = s.sanitize(&input);
    assert_eq!(out, input);
    Ok(())
}

#[test]
fn test_encoded_placeholder_text_stays_in_place() -> Result<()> {
    let s = sanitizer()?;
    let entity = format!("see __MERMAID&#95;BLOCK_0__ here\n{FLOW}");
    assert_eq!(s.sanitize(&entity), format!("see __MERMAID_BLOCK_0__ here\n{FLOW}"));

    let split = format!("x __MERMAID<i></i>_BLOCK_0__ y\n{FLOW}");
    assert_eq!(s.sanitize(&split), format!("x __MERMAID_BLOCK_0__ y\n{FLOW}"));
    Ok(())
}

#[test]
fn test_block_inside_script_is_dropped_with_script() -> Result<()> {
    let s = sanitizer()?;
    let out = s.sanitize(&format!("<script>\n{FLOW}\n</script>ok"));
    assert_eq!(out, "ok");
    Ok(())
}

#[test]
fn test_configured_languages() -> Result<()> {
    let config = FencekeepConfig {
        fences: FenceConfig { languages: vec!["mermaid".to_string(), "plantuml".to_string()] },
        ..FencekeepConfig::default()
    };
    let s = BlockPreservingSanitizer::new(&config)?;
    let input = "```plantuml\nA -> B : <call>\n```\n<b>t</b>";
    assert_eq!(s.sanitize(input), "```plantuml\nA -> B : <call>\n```\nt");
    Ok(())
}

#[test]
fn test_structural_mirroring() -> Result<()> {
    let s = sanitizer()?;
    let a = "<b>a</b>";
    let b = FLOW;

    let sequence = s.sanitize_value(&json!([a, b]))?;
    assert_eq!(sequence, json!([s.sanitize(a), s.sanitize(b)]));

    let mapping = s.sanitize_value(&json!({ "title": a, "nested": { "diagram": b } }))?;
    assert_eq!(mapping, json!({ "title": "a", "nested": { "diagram": b } }));
    Ok(())
}

#[test]
fn test_non_text_values_pass_through() -> Result<()> {
    let s = sanitizer()?;
    let value = json!({ "count": 3, "flag": false, "missing": null, "ratio": 0.5 });
    assert_eq!(s.sanitize_value(&value)?, value);
    assert_eq!(s.sanitize_value(&json!(""))?, json!(""));
    Ok(())
}
