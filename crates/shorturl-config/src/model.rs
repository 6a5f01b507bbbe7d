//! Configuration snapshot and the typed settings derived from it.
//!
//! # Design
//! - `ConfigSnapshot` is an immutable map addressed by dotted paths.
//! - `ShortUrlSettings` only exists for snapshots that passed every rule.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{self, default_document};
use crate::error::{ConfigError, ConfigResult, ConfigValidationError};
use crate::validate::check_settings;

/// Read interface over a resolved configuration store.
pub trait ConfigSource {
    /// Look up a value by dotted path (`tracking.fields.ip_address`).
    ///
    /// Returns `None` when the path is absent; an explicit `null` is `Some`.
    fn lookup(&self, path: &str) -> Option<&Value>;
}

/// Resolve a path, falling back to the documented default when absent.
pub(crate) fn resolve<'a, S>(source: &'a S, path: &str) -> Cow<'a, Value>
where
    S: ConfigSource + ?Sized,
{
    source.lookup(path).map_or_else(
        || Cow::Owned(defaults::default_for(path).unwrap_or(Value::Null)),
        Cow::Borrowed,
    )
}

fn lookup_in<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// Immutable set of configuration values captured at validation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    values: Map<String, Value>,
}

impl ConfigSnapshot {
    /// Wrap an already-resolved map.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Snapshot holding only the documented defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(default_document())
    }

    /// Build a snapshot from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RootNotObject`] when the document root is not a map.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(values) => Ok(Self::new(values)),
            other => Err(ConfigError::RootNotObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Overlay `overrides` on top of the defaults, merging nested maps.
    #[must_use]
    pub fn merged_over_defaults(overrides: Map<String, Value>) -> Self {
        let mut values = default_document();
        merge_maps(&mut values, overrides);
        Self::new(values)
    }

    /// Copy of this snapshot with `path` set to `value`.
    ///
    /// Intermediate segments that are missing or not maps are replaced by maps.
    #[must_use]
    pub fn with(mut self, path: &str, value: Value) -> Self {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut self.values, &segments, value);
        self
    }

    /// Value at a dotted path, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup_in(&self.values, path)
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the snapshot into its underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl ConfigSource for ConfigSnapshot {
    fn lookup(&self, path: &str) -> Option<&Value> {
        self.get(path)
    }
}

impl ConfigSource for Map<String, Value> {
    fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_in(self, path)
    }
}

impl ConfigSource for Value {
    fn lookup(&self, path: &str) -> Option<&Value> {
        self.as_object().and_then(|map| lookup_in(map, path))
    }
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(nested) = entry {
                insert_path(nested, rest, value);
            } else {
                let mut nested = Map::new();
                insert_path(&mut nested, rest, value);
                *entry = Value::Object(nested);
            }
        }
    }
}

fn merge_maps(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge_maps(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// HTTP status used when a short URL redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u16")]
pub enum RedirectStatus {
    /// 301.
    #[default]
    MovedPermanently,
    /// 302.
    Found,
    /// 303.
    SeeOther,
    /// 307.
    TemporaryRedirect,
    /// 308.
    PermanentRedirect,
}

impl RedirectStatus {
    /// Every accepted redirect status, in ascending code order.
    pub const ALL: [Self; 5] = [
        Self::MovedPermanently,
        Self::Found,
        Self::SeeOther,
        Self::TemporaryRedirect,
        Self::PermanentRedirect,
    ];

    /// Numeric HTTP status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::MovedPermanently => 301,
            Self::Found => 302,
            Self::SeeOther => 303,
            Self::TemporaryRedirect => 307,
            Self::PermanentRedirect => 308,
        }
    }
}

impl TryFrom<i64> for RedirectStatus {
    type Error = ConfigValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| i64::from(status.code()) == value)
            .ok_or_else(|| ConfigValidationError::InvalidRedirectStatus {
                value: value.to_string(),
            })
    }
}

impl From<RedirectStatus> for u16 {
    fn from(status: RedirectStatus) -> Self {
        status.code()
    }
}

/// Visit tracking toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingSettings {
    /// Whether new short URLs track visits unless told otherwise.
    pub default_enabled: bool,
    /// Per-attribute recording toggles keyed by attribute name.
    pub fields: BTreeMap<String, bool>,
}

impl TrackingSettings {
    /// Whether the named visit attribute is recorded.
    #[must_use]
    pub fn records(&self, field: &str) -> bool {
        self.fields.get(field).copied().unwrap_or(false)
    }
}

/// Database table names used by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNames {
    /// Table holding short URLs.
    pub short_urls: String,
    /// Table holding recorded visits.
    pub short_url_visits: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            short_urls: defaults::SHORT_URLS_TABLE.to_string(),
            short_url_visits: defaults::SHORT_URL_VISITS_TABLE.to_string(),
        }
    }
}

/// Typed view over a snapshot that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShortUrlSettings {
    /// Number of characters in generated URL keys.
    pub key_length: u32,
    /// Salt fed to the key generator.
    pub key_salt: String,
    /// Visit tracking toggles.
    pub tracking: TrackingSettings,
    /// Whether the built-in redirect route is disabled.
    pub disable_default_route: bool,
    /// Whether destination URLs are forced to HTTPS.
    pub enforce_https: bool,
    /// Whether query parameters are forwarded to the destination.
    pub forward_query_params: bool,
    /// Base URL for generated short links; `None` means the host application URL.
    pub default_url: Option<String>,
    /// Redirect status applied when a link does not set one.
    pub redirect_status: RedirectStatus,
    /// Table names for the persistence layer.
    pub tables: TableNames,
}

impl ShortUrlSettings {
    /// Validate `source` and extract the typed settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] carrying the first failing rule.
    pub fn from_source<S>(source: &S) -> ConfigResult<Self>
    where
        S: ConfigSource + ?Sized,
    {
        Ok(check_settings(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_dotted_paths() {
        let snapshot = ConfigSnapshot::from_value(json!({
            "tracking": { "fields": { "ip_address": false } },
            "default_url": null,
        }))
        .expect("map root");

        assert_eq!(
            snapshot.lookup("tracking.fields.ip_address"),
            Some(&json!(false))
        );
        assert_eq!(snapshot.lookup("default_url"), Some(&Value::Null));
        assert_eq!(snapshot.lookup("tracking.fields.browser"), None);
        assert_eq!(snapshot.lookup("default_url.nested"), None);
    }

    #[test]
    fn from_value_rejects_non_map_roots() {
        let err = ConfigSnapshot::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotObject { found: "array" }));
    }

    #[test]
    fn resolve_falls_back_to_defaults_only_when_absent() {
        let snapshot = ConfigSnapshot::default().with("default_short_urls_table", Value::Null);
        assert_eq!(
            resolve(&snapshot, "default_short_urls_table").as_ref(),
            &Value::Null
        );
        assert_eq!(resolve(&snapshot, "key_length").as_ref(), &json!(5));
        assert_eq!(resolve(&snapshot, "no_such_key").as_ref(), &Value::Null);
    }

    #[test]
    fn merge_keeps_unrelated_nested_defaults() {
        let overrides = json!({
            "tracking": { "fields": { "ip_address": false } },
            "key_length": 8,
        });
        let Value::Object(overrides) = overrides else {
            panic!("expected map");
        };
        let snapshot = ConfigSnapshot::merged_over_defaults(overrides);

        assert_eq!(snapshot.get("key_length"), Some(&json!(8)));
        assert_eq!(
            snapshot.get("tracking.fields.ip_address"),
            Some(&json!(false))
        );
        assert_eq!(snapshot.get("tracking.fields.browser"), Some(&json!(true)));
        assert_eq!(snapshot.get("tracking.default_enabled"), Some(&json!(true)));
    }

    #[test]
    fn with_replaces_scalar_intermediates() {
        let snapshot = ConfigSnapshot::default()
            .with("tracking", json!("flat"))
            .with("tracking.fields.browser", json!(false));
        assert_eq!(
            snapshot.get("tracking.fields.browser"),
            Some(&json!(false))
        );
    }

    #[test]
    fn redirect_status_accepts_only_listed_codes() {
        for status in RedirectStatus::ALL {
            let parsed = RedirectStatus::try_from(i64::from(status.code())).expect("listed code");
            assert_eq!(parsed, status);
        }
        assert!(RedirectStatus::try_from(200).is_err());
        assert!(RedirectStatus::try_from(-100).is_err());
        assert_eq!(RedirectStatus::default().code(), 301);
    }

    #[test]
    fn tracking_records_unknown_fields_as_disabled() {
        let tracking = TrackingSettings {
            default_enabled: true,
            fields: BTreeMap::from([("browser".to_string(), true)]),
        };
        assert!(tracking.records("browser"));
        assert!(!tracking.records("ip_address"));
    }
}
