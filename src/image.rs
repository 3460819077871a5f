//! Image reference resolution.
//!
//! Product records carry image references in many shapes: a single URL
//! string, an array of strings, an array of objects, or a JSON-encoded
//! string of either. Candidates are collected in a fixed order and the
//! first one that resolves to an absolute URL wins; an unresolvable
//! record degrades to the configured default image, never an error.

use serde_json::Value;

use crate::resolve::field;
use crate::settings::FeedSettings;

/// Object keys that may carry an image URL, in preference order.
const IMAGE_URL_KEYS: &[&str] = &["url", "src", "path", "publicUrl"];

/// Record fields holding image collections, searched after the direct
/// `image` field.
const IMAGE_COLLECTION_FIELDS: &[&str] = &[
    "images",
    "additionalImages",
    "additional_images",
    "seo.images",
    "merchantImages",
    "merchant_images",
];

/// Resolve the best image URL for a record, falling back to the settings
/// default when nothing usable is found.
pub fn resolve_image(record: &Value, settings: &FeedSettings) -> String {
    for candidate in collect_candidates(record) {
        if let Some(resolved) = resolve_candidate(&candidate, settings) {
            return resolved;
        }
    }
    tracing::debug!("no usable image reference, using default image");
    settings.default_image_url.clone()
}

/// Gather plain string candidates from the direct image field and each
/// known collection, decoding JSON-encoded strings and object entries.
fn collect_candidates(record: &Value) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(direct) = record.get("image") {
        push_candidates(direct, &mut candidates);
    }
    for path in IMAGE_COLLECTION_FIELDS {
        if let Some(collection) = field(record, path) {
            push_candidates(collection, &mut candidates);
        }
    }

    candidates
}

/// Flatten one image field value into string candidates.
fn push_candidates(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return;
            }
            // A JSON-encoded collection is decoded and flattened; anything
            // else is taken as a direct reference.
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                if let Ok(decoded) = serde_json::from_str::<Value>(trimmed) {
                    push_candidates(&decoded, out);
                    return;
                }
            }
            out.push(trimmed.to_string());
        }
        Value::Array(items) => {
            for item in items {
                push_candidates(item, out);
            }
        }
        Value::Object(map) => {
            for key in IMAGE_URL_KEYS {
                if let Some(Value::String(s)) = map.get(*key) {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        out.push(trimmed.to_string());
                        return;
                    }
                }
            }
        }
        _ => {}
    }
}

/// Resolve one candidate to an absolute URL, trying each strategy in order.
fn resolve_candidate(candidate: &str, settings: &FeedSettings) -> Option<String> {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return settings.site_url.join(candidate).ok().map(|u| u.to_string());
    }

    if candidate.starts_with("//") {
        let with_scheme = format!("https:{candidate}");
        return settings
            .site_url
            .join(&with_scheme)
            .ok()
            .map(|u| u.to_string());
    }

    // Storage-style references: composed against the public bucket prefix,
    // no existence check. Bare object names get the default bucket.
    if let Some(prefix) = &settings.storage_public_prefix {
        let cleaned = candidate.trim_start_matches('/');
        if cleaned.is_empty() {
            return None;
        }
        let object_path = if cleaned.contains('/') {
            cleaned.to_string()
        } else {
            format!("{}/{}", settings.storage_bucket_name, cleaned)
        };
        return Some(format!("{prefix}{object_path}"));
    }

    if candidate.starts_with('/') {
        return settings.site_url.join(candidate).ok().map(|u| u.to_string());
    }

    None
}
