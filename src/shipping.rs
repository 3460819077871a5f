//! Shipping data normalization.
//!
//! The shipping field on a record may be absent, a scalar price, a single
//! object, or an array of objects. The shape is decoded once into
//! [`ShippingField`] and each entry is then normalized to a
//! [`ShippingRule`] with settings-backed fallbacks.

use serde_json::Value;

use crate::price::{parse_number, parse_price};
use crate::resolve::pick_text;
use crate::settings::FeedSettings;
use crate::types::ShippingRule;

/// The closed set of shapes a shipping field can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ShippingField {
    Absent,
    Scalar(f64),
    Entries(Vec<Value>),
}

/// Decode the raw shipping value into its shape, once.
pub fn decode_shipping(value: Option<&Value>) -> ShippingField {
    match value {
        None | Some(Value::Null) => ShippingField::Absent,
        Some(v @ (Value::Number(_) | Value::String(_))) => match parse_number(v) {
            Some(price) => ShippingField::Scalar(price),
            None => ShippingField::Absent,
        },
        Some(obj @ Value::Object(_)) => ShippingField::Entries(vec![obj.clone()]),
        Some(Value::Array(items)) => ShippingField::Entries(
            items
                .iter()
                .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
                .filter(|v| !matches!(v, Value::String(s) if s.trim().is_empty()))
                .filter(|v| !matches!(v, Value::Number(n) if n.as_f64() == Some(0.0)))
                .cloned()
                .collect(),
        ),
        Some(Value::Bool(_)) => ShippingField::Absent,
    }
}

/// Normalize a record's shipping field into canonical rules.
///
/// An empty result means the caller should synthesize a single rule from
/// the settings defaults.
pub fn normalize_shipping(
    value: Option<&Value>,
    settings: &FeedSettings,
    currency: &str,
) -> Vec<ShippingRule> {
    match decode_shipping(value) {
        ShippingField::Absent => Vec::new(),
        ShippingField::Scalar(price) => {
            // Negative scalars are not a valid shipping price; use the
            // configured default like any other unusable price.
            let price = if price < 0.0 {
                settings.default_shipping_price
            } else {
                (price * 100.0).round() / 100.0
            };
            vec![ShippingRule {
                country: settings.default_shipping_country.clone(),
                region: None,
                service: settings.default_shipping_service.clone(),
                price,
                currency: currency.to_uppercase(),
            }]
        }
        ShippingField::Entries(entries) => entries
            .iter()
            .map(|entry| normalize_entry(entry, settings, currency))
            .collect(),
    }
}

/// Synthesize the single fallback rule from settings defaults.
pub fn default_rule(settings: &FeedSettings, currency: &str) -> ShippingRule {
    ShippingRule {
        country: settings.default_shipping_country.clone(),
        region: None,
        service: settings.default_shipping_service.clone(),
        price: settings.default_shipping_price,
        currency: currency.to_uppercase(),
    }
}

fn normalize_entry(entry: &Value, settings: &FeedSettings, currency: &str) -> ShippingRule {
    let country = pick_text([
        entry.get("country"),
        entry.get("countryCode"),
        entry.get("country_code"),
    ]);
    let country = if country.is_empty() {
        settings.default_shipping_country.clone()
    } else {
        country
    };

    let region = pick_text([entry.get("region"), entry.get("state")]);
    let region = if region.is_empty() { None } else { Some(region) };

    let service = pick_text([
        entry.get("service"),
        entry.get("serviceName"),
        entry.get("service_name"),
        entry.get("method"),
    ]);
    let service = if service.is_empty() {
        settings.default_shipping_service.clone()
    } else {
        service
    };

    let price = entry
        .get("price")
        .and_then(parse_price)
        .filter(|p| *p >= 0.0)
        .unwrap_or(settings.default_shipping_price);

    let entry_currency = pick_text([entry.get("currency")]);
    let currency = if entry_currency.is_empty() {
        currency.to_uppercase()
    } else {
        entry_currency.to_uppercase()
    };

    ShippingRule {
        country,
        region,
        service,
        price,
        currency,
    }
}
