//! Ordered rule checks over a configuration source.
//!
//! Rules run in a fixed order and the first violation is returned. There is no
//! aggregation of multiple errors.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::defaults::MIN_KEY_LENGTH;
use crate::error::{ConfigResult, ConfigValidationError};
use crate::model::{
    ConfigSource, RedirectStatus, ShortUrlSettings, TableNames, TrackingSettings, resolve,
};

type Result<T> = std::result::Result<T, ConfigValidationError>;

/// Check every recognised key of `source` against its rule.
///
/// Absent keys are checked against their documented default.
///
/// # Errors
///
/// Returns the first violated rule.
#[instrument(name = "config.validate", skip_all)]
pub fn validate_config<S>(source: &S) -> Result<()>
where
    S: ConfigSource + ?Sized,
{
    match check_settings(source) {
        Ok(_) => {
            debug!("short url configuration passed validation");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "short url configuration rejected");
            Err(err)
        }
    }
}

/// Startup boundary wrapper around [`validate_config`].
///
/// # Errors
///
/// Returns [`crate::ConfigError::Validation`] when any rule fails.
pub fn ensure_valid<S>(source: &S) -> ConfigResult<()>
where
    S: ConfigSource + ?Sized,
{
    validate_config(source)?;
    Ok(())
}

/// Run validation only when the `validate_config` switch is on.
///
/// Returns whether validation ran.
///
/// # Errors
///
/// Returns [`crate::ConfigError::Validation`] when the switch is not a boolean
/// or when it is on and any rule fails.
pub fn startup_gate<S>(source: &S) -> ConfigResult<bool>
where
    S: ConfigSource + ?Sized,
{
    if !boolean(source, "validate_config")? {
        debug!("configuration validation disabled at startup");
        return Ok(false);
    }
    ensure_valid(source)?;
    Ok(true)
}

pub(crate) fn check_settings<S>(source: &S) -> Result<ShortUrlSettings>
where
    S: ConfigSource + ?Sized,
{
    let key_length = key_length(&resolve(source, "key_length"))?;
    let default_enabled = boolean(source, "tracking.default_enabled")?;
    let fields = tracking_fields(&resolve(source, "tracking.fields"))?;
    let disable_default_route = boolean(source, "disable_default_route")?;
    let key_salt = key_salt(&resolve(source, "key_salt"))?;
    let enforce_https = boolean(source, "enforce_https")?;
    let forward_query_params = boolean(source, "forward_query_params")?;
    let default_url = nullable_string(source, "default_url")?;
    let redirect_status = redirect_status(&resolve(source, "default_redirect_status_code"))?;
    let short_urls = nullable_string(source, "default_short_urls_table")?;
    let short_url_visits = nullable_string(source, "default_short_url_visits_table")?;

    let fallback = TableNames::default();
    Ok(ShortUrlSettings {
        key_length,
        key_salt,
        tracking: TrackingSettings {
            default_enabled,
            fields,
        },
        disable_default_route,
        enforce_https,
        forward_query_params,
        default_url,
        redirect_status: redirect_status.unwrap_or_default(),
        tables: TableNames {
            short_urls: short_urls.unwrap_or(fallback.short_urls),
            short_url_visits: short_url_visits.unwrap_or(fallback.short_url_visits),
        },
    })
}

fn key_length(value: &Value) -> Result<u32> {
    let Value::Number(number) = value else {
        return Err(ConfigValidationError::KeyLengthNotInteger);
    };
    // Integers above i64::MAX only fit in u64 and are always out of range.
    let Some(length) = number.as_i64() else {
        return Err(ConfigValidationError::KeyLengthNotInteger);
    };
    if length < MIN_KEY_LENGTH {
        return Err(ConfigValidationError::KeyLengthTooShort { length });
    }
    u32::try_from(length).map_err(|_| ConfigValidationError::KeyLengthNotInteger)
}

fn boolean<S>(source: &S, path: &str) -> Result<bool>
where
    S: ConfigSource + ?Sized,
{
    resolve(source, path)
        .as_bool()
        .ok_or_else(|| ConfigValidationError::NotBoolean {
            field: field_name(path).to_string(),
        })
}

fn tracking_fields(value: &Value) -> Result<BTreeMap<String, bool>> {
    let Value::Object(fields) = value else {
        return Err(ConfigValidationError::TrackingFieldsNotMap);
    };
    fields
        .iter()
        .map(|(name, toggle)| {
            toggle
                .as_bool()
                .map(|enabled| (name.clone(), enabled))
                .ok_or_else(|| ConfigValidationError::NotBoolean {
                    field: name.clone(),
                })
        })
        .collect()
}

fn key_salt(value: &Value) -> Result<String> {
    let Value::String(salt) = value else {
        return Err(ConfigValidationError::KeySaltNotString);
    };
    if salt.is_empty() {
        return Err(ConfigValidationError::KeySaltEmpty);
    }
    Ok(salt.clone())
}

fn nullable_string<S>(source: &S, field: &'static str) -> Result<Option<String>>
where
    S: ConfigSource + ?Sized,
{
    match resolve(source, field).as_ref() {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(ConfigValidationError::NotStringOrNull { field }),
    }
}

fn redirect_status(value: &Value) -> Result<Option<RedirectStatus>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| invalid_redirect(value))
            .and_then(RedirectStatus::try_from)
            .map(Some),
        other => Err(invalid_redirect(other)),
    }
}

fn invalid_redirect(value: &Value) -> ConfigValidationError {
    ConfigValidationError::InvalidRedirectStatus {
        value: value.to_string(),
    }
}

fn field_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigSnapshot;
    use serde_json::json;

    fn valid() -> ConfigSnapshot {
        ConfigSnapshot::with_defaults()
    }

    fn rejection(snapshot: &ConfigSnapshot) -> String {
        validate_config(snapshot)
            .expect_err("snapshot should be rejected")
            .to_string()
    }

    #[test]
    fn defaults_pass() {
        assert_eq!(validate_config(&valid()), Ok(()));
        assert_eq!(validate_config(&ConfigSnapshot::default()), Ok(()));
    }

    #[test]
    fn key_length_must_fit_in_u32() {
        let snapshot = valid().with("key_length", json!(u32::MAX));
        let settings = check_settings(&snapshot).expect("valid");
        assert_eq!(settings.key_length, u32::MAX);

        for oversized in [json!(u64::from(u32::MAX) + 1), json!(u64::MAX)] {
            assert_eq!(
                rejection(&valid().with("key_length", oversized)),
                "The config URL length is not a valid integer."
            );
        }
    }

    #[test]
    fn key_length_rejects_fractional_and_negative_numbers() {
        assert_eq!(
            rejection(&valid().with("key_length", json!(4.5))),
            "The config URL length is not a valid integer."
        );
        assert_eq!(
            rejection(&valid().with("key_length", json!(-7))),
            "The config URL length must be 3 or above."
        );
        assert_eq!(
            rejection(&valid().with("key_length", json!(true))),
            "The config URL length is not a valid integer."
        );
    }

    #[test]
    fn key_length_boundary_is_three() {
        assert!(validate_config(&valid().with("key_length", json!(3))).is_ok());
        assert_eq!(
            validate_config(&valid().with("key_length", json!(2))),
            Err(ConfigValidationError::KeyLengthTooShort { length: 2 })
        );
    }

    #[test]
    fn tracking_fields_must_be_a_map() {
        assert_eq!(
            rejection(&valid().with("tracking.fields", json!(null))),
            "The tracking fields config variable must be a map of booleans."
        );
    }

    #[test]
    fn tracking_fields_are_checked_in_declaration_order() {
        let snapshot = valid()
            .with("tracking.fields.ip_address", json!("INVALID"))
            .with("tracking.fields.browser", json!("INVALID"));
        assert_eq!(
            rejection(&snapshot),
            "The ip_address config variable must be a boolean."
        );

        let document = json!({
            "tracking": { "fields": { "referer_url": 0, "browser": 1 } }
        });
        assert_eq!(
            validate_config(&document),
            Err(ConfigValidationError::NotBoolean {
                field: "referer_url".to_string()
            })
        );
    }

    #[test]
    fn unknown_tracking_fields_are_still_checked() {
        assert_eq!(
            rejection(&valid().with("tracking.fields.custom_header", json!(1))),
            "The custom_header config variable must be a boolean."
        );
    }

    #[test]
    fn redirect_status_rejects_floats_and_unlisted_codes() {
        let expected = "The default_redirect_status_code config variable must be a 301, 302, 303, 307, 308, or null.";
        assert_eq!(
            rejection(&valid().with("default_redirect_status_code", json!(301.0))),
            expected
        );
        assert_eq!(
            rejection(&valid().with("default_redirect_status_code", json!(200))),
            expected
        );
        for status in RedirectStatus::ALL {
            let snapshot = valid().with("default_redirect_status_code", json!(status.code()));
            assert_eq!(
                check_settings(&snapshot).map(|settings| settings.redirect_status),
                Ok(status)
            );
        }
    }

    #[test]
    fn null_overrides_fall_back_in_typed_settings() {
        let snapshot = valid()
            .with("default_redirect_status_code", Value::Null)
            .with("default_short_urls_table", Value::Null)
            .with("default_short_url_visits_table", json!("visits"));
        let settings = check_settings(&snapshot).expect("valid");
        assert_eq!(settings.redirect_status, RedirectStatus::MovedPermanently);
        assert_eq!(settings.tables.short_urls, "short_urls");
        assert_eq!(settings.tables.short_url_visits, "visits");
        assert_eq!(settings.default_url, None);
    }

    #[test]
    fn startup_gate_respects_switch() {
        let broken = valid().with("key_length", json!(1));
        assert!(!startup_gate(&broken).expect("switch off skips checks"));

        let enabled = broken.with("validate_config", json!(true));
        let err = startup_gate(&enabled).expect_err("switch on runs checks");
        assert_eq!(
            err.as_validation(),
            Some(&ConfigValidationError::KeyLengthTooShort { length: 1 })
        );

        let clean = valid().with("validate_config", json!(true));
        assert!(startup_gate(&clean).expect("valid config passes"));

        let malformed = valid().with("validate_config", json!("yes"));
        let err = startup_gate(&malformed).expect_err("switch must be boolean");
        assert_eq!(
            err.as_validation().map(ToString::to_string).as_deref(),
            Some("The validate_config config variable must be a boolean.")
        );
    }
}
