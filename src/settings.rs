//! Caller-supplied options and the resolved, immutable build settings.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Fallback site URL used when the caller supplies none (or an invalid one).
pub const DEFAULT_SITE_URL: &str = "https://www.example-store.com";
/// Default image path, made absolute against the site URL.
pub const DEFAULT_IMAGE_PATH: &str = "/images/default-product.jpg";
pub const DEFAULT_SHIPPING_COUNTRY: &str = "BR";
pub const DEFAULT_SHIPPING_SERVICE: &str = "Standard";
pub const DEFAULT_SHIPPING_PRICE: f64 = 0.0;
/// Google taxonomy id for "Hardware".
pub const DEFAULT_GOOGLE_CATEGORY: &str = "632";
/// Placeholder price applied to quote items when no override is configured.
pub const DEFAULT_QUOTE_PRICE: f64 = 999_999.0;
pub const DEFAULT_QUOTE_LABEL_INDEX: usize = 0;
/// Bucket used for bare object names in storage-style image references.
pub const DEFAULT_BUCKET_NAME: &str = "products";
pub const DEFAULT_CURRENCY: &str = "BRL";
pub const DEFAULT_CHANNEL_TITLE: &str = "Product feed";

/// Quote-price policy: a numeric placeholder price, or the `"disable"`
/// sentinel meaning priceless records are rejected instead of quoted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotePricePolicy {
    Disabled,
    Value(f64),
}

/// Raw `quotePriceValue` option: a number or the string `"disable"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuotePriceOption {
    Number(f64),
    Text(String),
}

/// Caller-supplied overrides. Every field is optional; missing fields fall
/// back to the built-in defaults during [`FeedSettings::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedOptions {
    pub site_url: Option<String>,
    pub default_image_url: Option<String>,
    pub default_shipping_country: Option<String>,
    pub default_shipping_service: Option<String>,
    pub default_shipping_price_value: Option<f64>,
    pub quote_price_value: Option<QuotePriceOption>,
    pub quote_availability: Option<String>,
    pub quote_label: Option<String>,
    pub quote_label_index: Option<usize>,
    pub storage_bucket_url: Option<String>,
    pub storage_bucket_name: Option<String>,
    pub channel_title: Option<String>,
    pub channel_description: Option<String>,
    pub default_google_category: Option<String>,
}

/// Resolved configuration for one build. Immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSettings {
    pub site_url: Url,
    pub default_image_url: String,
    pub default_shipping_country: String,
    pub default_shipping_service: String,
    pub default_shipping_price: f64,
    pub default_google_category: String,
    pub channel_title: String,
    pub channel_description: String,
    pub quote_price: QuotePricePolicy,
    pub quote_availability: Option<String>,
    pub quote_label: Option<String>,
    pub quote_label_index: usize,
    /// Public object-URL prefix when a storage bucket base is configured.
    pub storage_public_prefix: Option<String>,
    pub storage_bucket_name: String,
}

impl FeedSettings {
    /// Resolve effective settings from caller overrides plus defaults.
    ///
    /// The one hard failure in the engine: neither the caller-supplied
    /// site URL nor [`DEFAULT_SITE_URL`] parses as an absolute http(s)
    /// URL. Everything else falls back silently.
    pub fn resolve(options: FeedOptions) -> Result<FeedSettings, ConfigError> {
        let site_url = match options.site_url.as_deref() {
            Some(raw) => {
                parse_site_url(raw).ok_or_else(|| ConfigError::InvalidSiteUrl(raw.to_string()))?
            }
            None => parse_site_url(DEFAULT_SITE_URL)
                .ok_or_else(|| ConfigError::InvalidSiteUrl(DEFAULT_SITE_URL.to_string()))?,
        };

        let default_image_url = match options.default_image_url.as_deref() {
            Some(path) => absolutize(&site_url, path),
            None => absolutize(&site_url, DEFAULT_IMAGE_PATH),
        };

        let quote_price = match options.quote_price_value {
            Some(QuotePriceOption::Number(v)) => QuotePricePolicy::Value(v),
            Some(QuotePriceOption::Text(ref s)) if s.eq_ignore_ascii_case("disable") => {
                QuotePricePolicy::Disabled
            }
            // Any other text is not a recognized policy; use the default.
            Some(QuotePriceOption::Text(_)) | None => QuotePricePolicy::Value(DEFAULT_QUOTE_PRICE),
        };

        let quote_label_index = match options.quote_label_index {
            Some(i) if i <= 4 => i,
            _ => DEFAULT_QUOTE_LABEL_INDEX,
        };

        let storage_public_prefix = options.storage_bucket_url.as_deref().map(|base| {
            format!("{}/storage/v1/object/public/", base.trim_end_matches('/'))
        });

        Ok(FeedSettings {
            default_image_url,
            default_shipping_country: options
                .default_shipping_country
                .unwrap_or_else(|| DEFAULT_SHIPPING_COUNTRY.to_string()),
            default_shipping_service: options
                .default_shipping_service
                .unwrap_or_else(|| DEFAULT_SHIPPING_SERVICE.to_string()),
            default_shipping_price: options
                .default_shipping_price_value
                .unwrap_or(DEFAULT_SHIPPING_PRICE),
            default_google_category: options
                .default_google_category
                .unwrap_or_else(|| DEFAULT_GOOGLE_CATEGORY.to_string()),
            channel_title: options
                .channel_title
                .unwrap_or_else(|| DEFAULT_CHANNEL_TITLE.to_string()),
            channel_description: options.channel_description.unwrap_or_default(),
            quote_price,
            quote_availability: options.quote_availability,
            quote_label: options.quote_label,
            quote_label_index,
            storage_public_prefix,
            storage_bucket_name: options
                .storage_bucket_name
                .unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            site_url,
        })
    }
}

/// Parse and normalize a candidate site URL: absolute http(s) only,
/// fragment stripped, no trailing slash on the path.
fn parse_site_url(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);
    Some(url)
}

/// Make a path absolute against the site URL; already-absolute values pass
/// through `Url::join` unchanged.
fn absolutize(site_url: &Url, path: &str) -> String {
    site_url
        .join(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_site_url_with_normalization() {
        let settings = FeedSettings::resolve(FeedOptions {
            site_url: Some("https://shop.example.com/#top".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.site_url.as_str(), "https://shop.example.com/");
        assert_eq!(settings.site_url.fragment(), None);
    }

    #[test]
    fn invalid_site_url_is_fatal() {
        let err = FeedSettings::resolve(FeedOptions {
            site_url: Some("not a url".to_string()),
            ..Default::default()
        });
        assert!(matches!(err, Err(ConfigError::InvalidSiteUrl(_))));
    }

    #[test]
    fn missing_site_url_falls_back_to_default() {
        let settings = FeedSettings::resolve(FeedOptions::default()).unwrap();
        assert!(settings.site_url.as_str().starts_with(DEFAULT_SITE_URL));
    }

    #[test]
    fn default_image_is_made_absolute() {
        let settings = FeedSettings::resolve(FeedOptions {
            site_url: Some("https://shop.example.com".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            settings.default_image_url,
            "https://shop.example.com/images/default-product.jpg"
        );
    }

    #[test]
    fn quote_price_disable_sentinel() {
        let settings = FeedSettings::resolve(FeedOptions {
            quote_price_value: Some(QuotePriceOption::Text("disable".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.quote_price, QuotePricePolicy::Disabled);
    }

    #[test]
    fn quote_label_index_clamped() {
        let settings = FeedSettings::resolve(FeedOptions {
            quote_label_index: Some(9),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.quote_label_index, DEFAULT_QUOTE_LABEL_INDEX);
    }

    #[test]
    fn storage_prefix_built_from_bucket_url() {
        let settings = FeedSettings::resolve(FeedOptions {
            storage_bucket_url: Some("https://storage.example.com/".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            settings.storage_public_prefix.as_deref(),
            Some("https://storage.example.com/storage/v1/object/public/")
        );
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let options: FeedOptions = serde_json::from_str(
            r#"{"siteUrl":"https://shop.example.com","quotePriceValue":150.0,"quoteLabelIndex":2}"#,
        )
        .unwrap();
        let settings = FeedSettings::resolve(options).unwrap();
        assert_eq!(settings.quote_price, QuotePricePolicy::Value(150.0));
        assert_eq!(settings.quote_label_index, 2);
    }
}
