//! Batch assembly and document serialization.
//!
//! Runs every record through the item builder, wraps the survivors in the
//! channel envelope and serializes the `g:`-namespaced item vocabulary.
//! A build always returns a [`FeedResult`]; bad records surface only as
//! diagnostics and a `skipped` count.

use std::fmt::Write;

use serde_json::Value;

use crate::error::ConfigError;
use crate::item::build_item;
use crate::price::format_price;
use crate::settings::{FeedOptions, FeedSettings};
use crate::types::{FeedItem, FeedResult, FeedStats};

/// Build a complete feed from raw product records.
///
/// The only error is a fatal settings failure; per-record problems are
/// reported through `warnings` and `stats.skipped` on the result.
pub fn build_feed(records: &[Value], options: FeedOptions) -> Result<FeedResult, ConfigError> {
    let settings = FeedSettings::resolve(options)?;

    let mut items = Vec::new();
    let mut warnings = Vec::new();
    for record in records {
        if let Some(item) = build_item(record, &settings, &mut warnings) {
            items.push(item);
        }
    }

    let stats = FeedStats {
        total: records.len(),
        valid: items.len(),
        skipped: records.len() - items.len(),
    };
    tracing::debug!(
        total = stats.total,
        valid = stats.valid,
        skipped = stats.skipped,
        "feed build finished"
    );

    let document = serialize_document(&items, &settings);

    Ok(FeedResult {
        document,
        items,
        stats,
        warnings,
        settings,
    })
}

/// Escape the five XML metacharacters in text content.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn serialize_document(items: &[FeedItem], settings: &FeedSettings) -> String {
    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str("<rss version=\"2.0\" xmlns:g=\"http://base.google.com/ns/1.0\">\n");
    doc.push_str("<channel>\n");
    write_tag(&mut doc, "title", &settings.channel_title);
    // The URL type always renders a host-root path as "/"; the channel
    // link keeps the trailing-slash-free form.
    write_tag(
        &mut doc,
        "link",
        settings.site_url.as_str().trim_end_matches('/'),
    );
    write_tag(&mut doc, "description", &settings.channel_description);
    for item in items {
        serialize_item(&mut doc, item);
    }
    doc.push_str("</channel>\n");
    doc.push_str("</rss>\n");
    doc
}

fn serialize_item(doc: &mut String, item: &FeedItem) {
    doc.push_str("<item>\n");
    write_tag(doc, "g:id", &item.id);
    write_tag(doc, "title", &item.title);
    write_tag(doc, "description", &item.description);
    write_tag(doc, "link", &item.link);
    write_tag(doc, "g:image_link", &item.image_link);
    write_tag(doc, "g:price", &item.price);
    write_tag(doc, "g:availability", &item.availability);
    write_tag(doc, "g:condition", item.condition.as_str());
    write_tag(doc, "g:brand", &item.brand);
    write_tag(
        doc,
        "g:identifier_exists",
        if item.identifier_exists { "yes" } else { "no" },
    );
    if let Some(gtin) = &item.gtin {
        write_tag(doc, "g:gtin", gtin);
    }
    if let Some(mpn) = &item.mpn {
        write_tag(doc, "g:mpn", mpn);
    }
    if let Some(product_type) = &item.product_type {
        write_tag(doc, "g:product_type", product_type);
    }
    write_tag(doc, "g:google_product_category", &item.google_product_category);
    if let Some(quantity) = item.quantity {
        write_tag(doc, "g:quantity", &quantity.to_string());
    }
    write_tag(doc, "g:shipping_weight", &item.shipping_weight);
    for rule in &item.shipping {
        doc.push_str("<g:shipping>\n");
        write_tag(doc, "g:country", &rule.country);
        if let Some(region) = &rule.region {
            write_tag(doc, "g:region", region);
        }
        write_tag(doc, "g:service", &rule.service);
        // Zero is a valid shipping price; normalization guarantees the
        // amount is non-negative, so formatting cannot fail.
        if let Some(price_text) = format_price(rule.price, &rule.currency, true) {
            write_tag(doc, "g:price", &price_text);
        }
        doc.push_str("</g:shipping>\n");
    }
    for label in &item.custom_labels {
        let tag = format!("g:custom_label_{}", label.index);
        write_tag(doc, &tag, &label.text);
    }
    doc.push_str("</item>\n");
}

fn write_tag(doc: &mut String, tag: &str, text: &str) {
    // Infallible for String; the Write trait just keeps this uniform.
    let _ = writeln!(doc, "<{tag}>{}</{tag}>", escape_xml(text));
}
