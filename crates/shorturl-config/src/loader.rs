//! Loading configuration documents from disk.
//!
//! # Design
//! - The parser is chosen from the file extension.
//! - Documents may nest settings under a `short-url` root key.
//! - Defaults are overlaid unless the caller opts out.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::defaults::ROOT_KEY;
use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigSnapshot;

/// Serialisation format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Options controlling how a document becomes a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Overlay the document on the documented defaults.
    pub apply_defaults: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            apply_defaults: true,
        }
    }
}

/// Parse an in-memory document into a snapshot.
///
/// # Errors
///
/// Returns a parse error for malformed input, or
/// [`ConfigError::RootNotObject`] when the settings are not a map.
pub fn parse_document(
    text: &str,
    format: DocumentFormat,
    options: LoadOptions,
) -> ConfigResult<ConfigSnapshot> {
    let document: Value = match format {
        DocumentFormat::Json => {
            serde_json::from_str(text).map_err(|source| ConfigError::ParseJson { source })?
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|source| ConfigError::ParseYaml { source })?
        }
    };

    let snapshot = ConfigSnapshot::from_value(unwrap_root(document))?;
    if options.apply_defaults {
        return Ok(ConfigSnapshot::merged_over_defaults(snapshot.into_map()));
    }
    Ok(snapshot)
}

/// Read and parse the document at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for unknown extensions,
/// [`ConfigError::Io`] when the file cannot be read, or any error from
/// [`parse_document`].
#[instrument(name = "config.load", skip(options), fields(path = %path.display()))]
pub fn load_snapshot(path: &Path, options: LoadOptions) -> ConfigResult<ConfigSnapshot> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "config.read",
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_document(&text, format, options)?;
    debug!(
        keys = snapshot.as_map().len(),
        defaults = options.apply_defaults,
        "loaded configuration document"
    );
    Ok(snapshot)
}

fn unwrap_root(document: Value) -> Value {
    match document {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(ROOT_KEY) => {
            map.remove(ROOT_KEY).unwrap_or_else(|| Value::Object(Map::new()))
        }
        other => other,
    }
}
