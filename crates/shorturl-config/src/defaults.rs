//! Documented defaults for the short URL configuration.
//!
//! # Design
//! - Absent keys resolve to these values before any rule is applied.
//! - An explicit `null` is a value and never falls back to a default.

use serde_json::{Map, Value, json};

/// Default number of characters in a generated URL key.
pub const KEY_LENGTH: i64 = 5;
/// Smallest accepted URL key length.
pub const MIN_KEY_LENGTH: i64 = 3;
/// Default salt fed to the key generator.
pub const KEY_SALT: &str = "AshAllenDesign\\ShortURL";
/// Default table holding short URLs.
pub const SHORT_URLS_TABLE: &str = "short_urls";
/// Default table holding recorded visits.
pub const SHORT_URL_VISITS_TABLE: &str = "short_url_visits";
/// Default redirect status code.
pub const REDIRECT_STATUS_CODE: i64 = 301;
/// Root key some documents nest the settings under.
pub const ROOT_KEY: &str = "short-url";

/// Visit attributes recorded when tracking is enabled, in declaration order.
pub const TRACKING_FIELDS: [&str; 7] = [
    "ip_address",
    "operating_system",
    "operating_system_version",
    "browser",
    "browser_version",
    "referer_url",
    "device_type",
];

/// Full default document.
#[must_use]
pub fn default_document() -> Map<String, Value> {
    let fields: Map<String, Value> = TRACKING_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), Value::Bool(true)))
        .collect();

    let document = json!({
        "key_length": KEY_LENGTH,
        "key_salt": KEY_SALT,
        "tracking": {
            "default_enabled": true,
            "fields": fields,
        },
        "disable_default_route": false,
        "enforce_https": true,
        "forward_query_params": false,
        "default_url": null,
        "default_redirect_status_code": REDIRECT_STATUS_CODE,
        "default_short_urls_table": SHORT_URLS_TABLE,
        "default_short_url_visits_table": SHORT_URL_VISITS_TABLE,
        "validate_config": false,
    });

    match document {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Default value for a dotted path, if one is documented.
#[must_use]
pub fn default_for(path: &str) -> Option<Value> {
    let document = Value::Object(default_document());
    let mut current = &document;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current.clone())
}
