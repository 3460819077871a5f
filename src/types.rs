use serde::{Deserialize, Serialize};

/// Stock availability vocabulary understood by shopping channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Preorder,
    Backorder,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in_stock",
            Availability::OutOfStock => "out_of_stock",
            Availability::Preorder => "preorder",
            Availability::Backorder => "backorder",
        }
    }
}

/// Product condition vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }
}

/// One normalized shipping rule attached to a feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRule {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub service: String,
    pub price: f64,
    pub currency: String,
}

/// A `custom_label_<n>` slot on a feed item. Slots run 0..=4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLabel {
    pub index: usize,
    pub text: String,
}

/// One fully-resolved feed entry - every field already validated,
/// truncated and formatted for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    /// Formatted price text, e.g. `"12.50 BRL"`.
    pub price: String,
    /// Availability label; normally an [`Availability`] value, but quote
    /// items may carry a configured override verbatim.
    pub availability: String,
    pub condition: Condition,
    pub brand: String,
    pub identifier_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    pub google_product_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Weight text, e.g. `"1 kg"` or `"0.25 kg"`.
    pub shipping_weight: String,
    pub shipping: Vec<ShippingRule>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub custom_labels: Vec<CustomLabel>,
}

/// A non-fatal, record-level issue captured during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine code, e.g. `missing_id` or `quote_price_applied`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
    /// Best-effort reference back to the offending record.
    pub reference: String,
}

impl Diagnostic {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            reference: reference.into(),
        }
    }
}

/// Counters for one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedStats {
    pub total: usize,
    pub valid: usize,
    pub skipped: usize,
}

/// Everything a build produces: the serialized document plus the
/// structured data programmatic callers inspect.
#[derive(Debug, Clone, Serialize)]
pub struct FeedResult {
    pub document: String,
    pub items: Vec<FeedItem>,
    pub stats: FeedStats,
    pub warnings: Vec<Diagnostic>,
    pub settings: crate::settings::FeedSettings,
}
