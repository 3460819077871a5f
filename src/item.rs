//! Per-record item building.
//!
//! One product record in, one [`FeedItem`] out - or a skip decision. Every
//! failure path is non-fatal: it appends a [`Diagnostic`] and returns
//! `None`, so a batch never aborts on bad data.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::image::resolve_image;
use crate::mapping::{map_availability, map_condition, sanitize_gtin};
use crate::price::{format_price, parse_number, parse_price};
use crate::resolve::{field, pick_text};
use crate::settings::{FeedSettings, QuotePricePolicy, DEFAULT_CURRENCY};
use crate::shipping::{default_rule, normalize_shipping};
use crate::types::{CustomLabel, Diagnostic, FeedItem};

pub const MAX_TITLE_LEN: usize = 150;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const FALLBACK_TITLE: &str = "Untitled product";
pub const FALLBACK_BRAND: &str = "Generic";

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

/// Build one feed item from a raw product record.
///
/// Returns `None` when the record is skipped; exactly one diagnostic is
/// recorded per skip. Quote substitution records a `quote_price_applied`
/// diagnostic but still produces an item.
pub fn build_item(
    record: &Value,
    settings: &FeedSettings,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<FeedItem> {
    // 1. Identity.
    let id = pick_text([
        record.get("id"),
        record.get("itemId"),
        record.get("item_id"),
        record.get("sku"),
        record.get("slug"),
    ]);
    if id.is_empty() {
        let reference = record_reference(record);
        tracing::debug!(reference = %reference, "skipping record without identity");
        diagnostics.push(Diagnostic::new(
            "missing_id",
            "Record has no resolvable id, sku or slug",
            reference,
        ));
        return None;
    }

    // 2. Title.
    let title = pick_text([
        record.get("name"),
        record.get("title"),
        field(record, "seo.title"),
    ]);
    let title = if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        truncate_chars(&title, MAX_TITLE_LEN)
    };

    // 3. Description.
    let raw_description = pick_text([
        record.get("description"),
        record.get("longDescription"),
        record.get("long_description"),
        record.get("shortDescription"),
        record.get("short_description"),
        field(record, "seo.description"),
    ]);
    let stripped = clean_text(&raw_description);
    let description = if stripped.is_empty() {
        title.clone()
    } else {
        truncate_chars(&stripped, MAX_DESCRIPTION_LEN)
    };

    // 4. Price, with quote fallback.
    let parsed_price = record.get("price").and_then(parse_price);
    let mut is_quote = false;
    let price = match parsed_price {
        Some(p) if p > 0.0 => p,
        _ => match settings.quote_price {
            QuotePricePolicy::Disabled => {
                tracing::debug!(id = %id, "skipping record with invalid price (quoting disabled)");
                diagnostics.push(Diagnostic::new(
                    "invalid_price",
                    "Price is missing or not positive and quote pricing is disabled",
                    id,
                ));
                return None;
            }
            QuotePricePolicy::Value(quote_value) => {
                is_quote = true;
                diagnostics.push(Diagnostic::new(
                    "quote_price_applied",
                    "Price is missing or not positive; quote placeholder applied",
                    id.clone(),
                ));
                quote_value
            }
        },
    };

    // 5. Currency.
    let currency = pick_text([
        record.get("currency"),
        record.get("priceCurrency"),
        record.get("price_currency"),
    ]);
    let currency = if currency.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        currency.to_uppercase()
    };

    // 6. Link.
    let link = match resolve_link(record, &id, settings) {
        Some(link) => link,
        None => {
            tracing::debug!(id = %id, "skipping record without resolvable link");
            diagnostics.push(Diagnostic::new(
                "invalid_link",
                "Record link could not be made absolute",
                id,
            ));
            return None;
        }
    };

    // 7. Image.
    let image_link = resolve_image(record, settings);

    // 8. Stock and availability.
    let stock_quantity = [
        record.get("stock"),
        record.get("stockQuantity"),
        record.get("stock_quantity"),
        record.get("quantity"),
        field(record, "inventory.quantity"),
    ]
    .into_iter()
    .flatten()
    .find_map(parse_number);

    let availability_text = pick_text([
        record.get("availability"),
        record.get("availabilityText"),
        record.get("status"),
    ]);
    let availability = match (&settings.quote_availability, is_quote) {
        (Some(override_label), true) => override_label.clone(),
        _ => map_availability(stock_quantity, &availability_text)
            .as_str()
            .to_string(),
    };
    let quantity = stock_quantity
        .filter(|q| *q >= 0.0)
        .map(|q| q.trunc() as i64);

    // 9. Condition, brand, identifiers, categories.
    let condition = map_condition(&pick_text([record.get("condition")]));

    let brand = pick_text([
        record.get("brand"),
        record.get("manufacturer"),
        record.get("vendor"),
    ]);
    let brand = if brand.is_empty() {
        FALLBACK_BRAND.to_string()
    } else {
        brand
    };

    let gtin = sanitize_gtin(&pick_text([
        record.get("gtin"),
        record.get("ean"),
        record.get("barcode"),
    ]));
    let identifier_exists = gtin.is_some();

    let mpn = pick_text([
        record.get("mpn"),
        record.get("reference"),
        record.get("sku"),
    ]);
    let mpn = if mpn.is_empty() {
        Some(id.clone())
    } else {
        Some(mpn)
    };

    let category = pick_text([
        record.get("category"),
        record.get("categoryName"),
        record.get("category_name"),
        record.get("productType"),
        record.get("product_type"),
    ]);
    let product_type = if category.is_empty() {
        None
    } else {
        Some(category)
    };

    let google_category = pick_text([
        record.get("googleCategory"),
        record.get("google_product_category"),
    ]);
    let google_product_category = if google_category.is_empty() {
        settings.default_google_category.clone()
    } else {
        google_category
    };

    // 10. Weight.
    let weight = [record.get("weight"), record.get("weightValue")]
        .into_iter()
        .flatten()
        .find_map(parse_number)
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0);
    let weight_unit = pick_text([record.get("weightUnit"), record.get("weight_unit")]);
    let weight_unit = if weight_unit.is_empty() {
        "kg".to_string()
    } else {
        weight_unit
    };
    // f64 Display keeps the shortest decimal form: "1 kg", "0.25 kg".
    let shipping_weight = format!("{} {}", weight, weight_unit);

    // 11. Shipping, with defaults fallback.
    let mut shipping = normalize_shipping(record.get("shipping"), settings, &currency);
    if shipping.is_empty() {
        shipping.push(default_rule(settings, &currency));
    }

    // 12. Price formatting.
    let price_text = match format_price(price, &currency, false) {
        Some(text) => text,
        None => {
            tracing::debug!(id = %id, price, "skipping record whose price failed to format");
            diagnostics.push(Diagnostic::new(
                "invalid_price_format",
                "Resolved price could not be formatted",
                id,
            ));
            return None;
        }
    };

    // 13. Custom labels.
    let mut custom_labels = Vec::new();
    if is_quote {
        if let Some(label) = &settings.quote_label {
            custom_labels.push(CustomLabel {
                index: settings.quote_label_index,
                text: label.clone(),
            });
        }
    }

    // 14. Assemble.
    Some(FeedItem {
        id,
        title,
        description,
        link,
        image_link,
        price: price_text,
        availability,
        condition,
        brand,
        identifier_exists,
        gtin,
        mpn,
        product_type,
        google_product_category,
        quantity,
        shipping_weight,
        shipping,
        custom_labels,
    })
}

/// Prefer an already-absolute link/url field; else derive
/// `/product/<slug-or-id>` against the site URL.
fn resolve_link(record: &Value, id: &str, settings: &FeedSettings) -> Option<String> {
    let direct = pick_text([record.get("link"), record.get("url")]);
    if direct.starts_with("http://") || direct.starts_with("https://") {
        if let Ok(url) = settings.site_url.join(&direct) {
            return Some(url.to_string());
        }
    }

    let slug = pick_text([record.get("slug"), record.get("handle")]);
    let tail = if slug.is_empty() { id } else { &slug };
    settings
        .site_url
        .join(&format!("/product/{tail}"))
        .ok()
        .map(|u| u.to_string())
}

/// Best-effort reference string for diagnostics on records that may lack
/// an id.
fn record_reference(record: &Value) -> String {
    let fallback = pick_text([record.get("sku"), record.get("name"), record.get("title")]);
    if fallback.is_empty() {
        "<unknown record>".to_string()
    } else {
        fallback
    }
}

/// Strip markup tags and collapse runs of whitespace.
fn clean_text(raw: &str) -> String {
    let stripped = HTML_TAG_REGEX.replace_all(raw, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Char-boundary-safe truncation.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
