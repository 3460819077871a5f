//! End-to-end feed build tests.
//!
//! Batch scenarios are defined as JSON fixtures under `tests/fixtures/`;
//! each fixture carries caller options, raw product records and the
//! expected outcome.

use std::fs;
use std::path::Path;

use merchant_feed::{build_feed, escape_xml, FeedOptions, QuotePriceOption};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct TestCase {
    options: FeedOptions,
    records: Vec<Value>,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    valid: usize,
    skipped: usize,
    #[serde(default)]
    warning_codes: Vec<String>,
    #[serde(default)]
    document_contains: Vec<String>,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let mut cases = Vec::new();
    for entry in fs::read_dir(&fixtures_dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read directory entry").path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            let case: TestCase = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
            cases.push((name, case));
        }
    }

    assert!(!cases.is_empty(), "No test fixtures found in {:?}", fixtures_dir);
    cases
}

#[test]
fn fixture_cases() {
    for (name, case) in load_test_cases() {
        let result = build_feed(&case.records, case.options)
            .unwrap_or_else(|e| panic!("{name}: build failed: {e}"));

        assert_eq!(result.stats.valid, case.expected.valid, "{name}: valid count");
        assert_eq!(result.stats.skipped, case.expected.skipped, "{name}: skipped count");
        assert_eq!(result.stats.total, case.records.len(), "{name}: total count");

        for code in &case.expected.warning_codes {
            assert!(
                result.warnings.iter().any(|w| &w.code == code),
                "{name}: expected warning code {code}, got {:?}",
                result.warnings
            );
        }
        for needle in &case.expected.document_contains {
            assert!(
                result.document.contains(needle),
                "{name}: document missing {needle:?}"
            );
        }
    }
}

fn options() -> FeedOptions {
    FeedOptions {
        site_url: Some("https://shop.example.com".to_string()),
        ..Default::default()
    }
}

#[test]
fn document_has_envelope_and_declaration() {
    let result = build_feed(&[], options()).unwrap();
    assert!(result.document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(result
        .document
        .contains("<rss version=\"2.0\" xmlns:g=\"http://base.google.com/ns/1.0\">"));
    assert!(result.document.contains("<channel>"));
    assert!(result.document.ends_with("</channel>\n</rss>\n"));
}

#[test]
fn metacharacters_are_escaped_once_and_recoverable() {
    let title = r#"Rock & Roll <"Deluxe"> 'Edition'"#;
    let records = vec![json!({"id": "1", "name": title, "price": 10})];
    let result = build_feed(&records, options()).unwrap();

    let escaped = escape_xml(title);
    assert!(result.document.contains(&format!("<title>{escaped}</title>")));
    // No double escaping.
    assert!(!result.document.contains("&amp;amp;"));
    // The escaped text unescapes back to the original.
    let recovered = escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    assert_eq!(recovered, title);
}

#[test]
fn builds_are_idempotent() {
    let records = vec![
        json!({"id": "1", "name": "A", "price": "10,00"}),
        json!({"id": "2", "name": "B", "price": 5, "shipping": 7}),
    ];
    let first = build_feed(&records, options()).unwrap();
    let second = build_feed(&records, options()).unwrap();
    assert_eq!(first.document, second.document);
}

#[test]
fn output_order_follows_input_order() {
    let records = vec![
        json!({"id": "b", "price": 1}),
        json!({"id": "a", "price": 1}),
        json!({"id": "c", "price": 1}),
    ];
    let result = build_feed(&records, options()).unwrap();
    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

#[test]
fn quote_fallback_end_to_end() {
    let records = vec![json!({"id": "q1", "name": "On request", "price": 0})];
    let opts = FeedOptions {
        quote_price_value: Some(QuotePriceOption::Number(1234.5)),
        quote_availability: Some("backorder".to_string()),
        ..options()
    };
    let result = build_feed(&records, opts).unwrap();

    assert_eq!(result.stats.valid, 1);
    assert_eq!(result.items[0].price, "1234.50 BRL");
    assert_eq!(result.items[0].availability, "backorder");
    assert!(result.warnings.iter().any(|w| w.code == "quote_price_applied"));
}

#[test]
fn shipping_fallback_block_in_document() {
    let records = vec![json!({"id": "1", "price": 10})];
    let result = build_feed(&records, options()).unwrap();
    let doc = &result.document;

    assert!(doc.contains("<g:shipping>"));
    assert!(doc.contains("<g:country>BR</g:country>"));
    assert!(doc.contains("<g:service>Standard</g:service>"));
    assert!(doc.contains("<g:price>0.00 BRL</g:price>"));
}

#[test]
fn shipping_entry_prices_are_formatted_like_product_prices() {
    let records = vec![json!({
        "id": "1",
        "price": 10,
        "shipping": [{"currency": "usd", "price": 5}]
    })];
    let result = build_feed(&records, options()).unwrap();
    assert!(result.document.contains("<g:price>5.00 USD</g:price>"));
    assert!(!result.document.contains("usd"));
}

#[test]
fn channel_link_has_no_trailing_slash() {
    let result = build_feed(&[], options()).unwrap();
    assert!(result
        .document
        .contains("<link>https://shop.example.com</link>"));
}

#[test]
fn hostile_record_shapes_never_abort_the_batch() {
    let records = vec![
        json!(null),
        json!(["an", "array"]),
        json!(42),
        json!({"id": {"deeply": {"nested": true}}, "price": {"weird": []}}),
        json!({"id": "survivor", "price": 10}),
    ];
    let result = build_feed(&records, options()).unwrap();
    assert_eq!(result.stats.total, 5);
    assert_eq!(result.stats.valid, 1);
    assert_eq!(result.items[0].id, "survivor");
    assert_eq!(result.warnings.len(), 4);
}
