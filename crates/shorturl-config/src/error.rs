//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The single rule violation reported by the validator.
///
/// `Display` renders the operator-facing message for the failing rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// `key_length` was not an integer.
    #[error("The config URL length is not a valid integer.")]
    KeyLengthNotInteger,
    /// `key_length` was an integer below the minimum.
    #[error("The config URL length must be 3 or above.")]
    KeyLengthTooShort {
        /// Offending length.
        length: i64,
    },
    /// A toggle was not a boolean.
    #[error("The {field} config variable must be a boolean.")]
    NotBoolean {
        /// Short name of the toggle (last path segment).
        field: String,
    },
    /// `tracking.fields` was not a map.
    #[error("The tracking fields config variable must be a map of booleans.")]
    TrackingFieldsNotMap,
    /// `key_salt` was not a string.
    #[error("The config key salt must be a string.")]
    KeySaltNotString,
    /// `key_salt` was an empty string.
    #[error("The config key salt must be at least 1 character long.")]
    KeySaltEmpty,
    /// A nullable string setting held another type.
    #[error("The {field} config variable must be a string or null.")]
    NotStringOrNull {
        /// Name of the setting.
        field: &'static str,
    },
    /// `default_redirect_status_code` was not null or an allowed code.
    #[error(
        "The default_redirect_status_code config variable must be a 301, 302, 303, 307, 308, or null."
    )]
    InvalidRedirectStatus {
        /// Offending value rendered as JSON.
        value: String,
    },
}

impl ConfigValidationError {
    /// Owned copy of the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration failed a validation rule.
    #[error("configuration validation failed")]
    Validation {
        /// Rule that failed.
        #[from]
        source: ConfigValidationError,
    },
    /// The document root was not a map.
    #[error("configuration root must be a map")]
    RootNotObject {
        /// JSON type name found at the root.
        found: &'static str,
    },
    /// The file extension did not map to a supported format.
    #[error("unsupported configuration format")]
    UnsupportedFormat {
        /// Path that was rejected.
        path: PathBuf,
    },
    /// A JSON document could not be parsed.
    #[error("failed to parse JSON configuration")]
    ParseJson {
        /// Source parser error.
        source: serde_json::Error,
    },
    /// A YAML document could not be parsed.
    #[error("failed to parse YAML configuration")]
    ParseYaml {
        /// Source parser error.
        source: serde_yaml::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl ConfigError {
    /// Returns the rule violation if this error came from validation.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ConfigValidationError> {
        match self {
            Self::Validation { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
