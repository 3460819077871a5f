//! Free-text to enumeration mapping and trade-identifier cleanup.

use crate::types::{Availability, Condition};

/// Map stock quantity and/or free-text availability to the feed vocabulary.
///
/// A numeric stock quantity always wins over the free-text field. The
/// text matching is deliberately loose substring matching ("pre" matches
/// "preorder" but also any text containing "pre"); best-effort by design
/// of the upstream data.
pub fn map_availability(stock_quantity: Option<f64>, text: &str) -> Availability {
    if let Some(quantity) = stock_quantity {
        return if quantity <= 0.0 {
            Availability::OutOfStock
        } else {
            Availability::InStock
        };
    }

    let lowered = text.to_lowercase();
    if lowered.contains("pre") {
        Availability::Preorder
    } else if lowered.contains("back") {
        Availability::Backorder
    } else if lowered.contains("out") {
        Availability::OutOfStock
    } else if lowered.contains("in") || lowered.contains("available") {
        Availability::InStock
    } else {
        Availability::InStock
    }
}

/// Map free-text condition (pt-BR variants included) to the feed vocabulary.
pub fn map_condition(text: &str) -> Condition {
    let lowered = text.to_lowercase();
    if lowered.contains("used") || lowered.contains("usado") {
        Condition::Used
    } else if lowered.contains("refurbished") || lowered.contains("recondicionado") {
        Condition::Refurbished
    } else {
        Condition::New
    }
}

/// Clean a GTIN/EAN/barcode: keep digits only, accept lengths 8..=14.
pub fn sanitize_gtin(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if (8..=14).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}
