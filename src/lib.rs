//! Product-feed normalization and serialization engine.
//!
//! Turns a heterogeneous, untrusted collection of product records into a
//! single schema-valid shopping feed document. Records with unusable data
//! are skipped with a diagnostic instead of failing the batch; the only
//! hard failure is an invalid site URL at settings-resolution time.
//!
//! ```
//! use merchant_feed::{build_feed, FeedOptions};
//! use serde_json::json;
//!
//! let records = vec![json!({
//!     "id": "42",
//!     "name": "Drywall Sheet",
//!     "price": "12,50",
//!     "slug": "drywall-sheet",
//! })];
//! let options = FeedOptions {
//!     site_url: Some("https://shop.example.com".to_string()),
//!     ..Default::default()
//! };
//! let result = build_feed(&records, options).unwrap();
//! assert_eq!(result.stats.valid, 1);
//! assert!(result.document.contains("12.50 BRL"));
//! ```

pub mod error;
pub mod feed;
pub mod image;
pub mod item;
pub mod mapping;
pub mod price;
pub mod resolve;
pub mod settings;
pub mod shipping;
pub mod types;

pub use error::ConfigError;
pub use feed::{build_feed, escape_xml};
pub use image::resolve_image;
pub use item::build_item;
pub use mapping::{map_availability, map_condition, sanitize_gtin};
pub use price::{format_price, parse_number, parse_price};
pub use resolve::pick_text;
pub use settings::{FeedOptions, FeedSettings, QuotePriceOption, QuotePricePolicy};
pub use shipping::{decode_shipping, normalize_shipping, ShippingField};
pub use types::{
    Availability, Condition, CustomLabel, Diagnostic, FeedItem, FeedResult, FeedStats,
    ShippingRule,
};
