//! Locale-tolerant numeric parsing and price formatting.

use serde_json::Value;

/// Parse a number from a JSON value.
///
/// Strings containing a comma are treated as comma-decimal locale input
/// (`"1.234,56"` -> `1234.56`): thousands dots are stripped and the comma
/// becomes the decimal separator. Returns `None` for anything that does
/// not parse to a finite number.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = if trimmed.contains(',') {
                trimmed.replace('.', "").replace(',', ".")
            } else {
                trimmed.to_string()
            };
            normalized.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Parse a monetary amount and round it to cents.
pub fn parse_price(value: &Value) -> Option<f64> {
    parse_number(value).map(|v| (v * 100.0).round() / 100.0)
}

/// Format an amount as `"<0.00> <CURRENCY>"`.
///
/// Returns `None` for non-finite or negative amounts, and for zero unless
/// `allow_zero` is set (shipping prices may be zero; product prices not).
pub fn format_price(amount: f64, currency: &str, allow_zero: bool) -> Option<String> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    if amount == 0.0 && !allow_zero {
        return None;
    }
    Some(format!("{:.2} {}", amount, currency.trim().to_uppercase()))
}
