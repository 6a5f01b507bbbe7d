//! Snapshot fixtures and temporary configuration documents.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use shorturl_config::ConfigSnapshot;
use tempfile::TempDir;

/// A fully specified snapshot that passes every rule.
#[must_use]
pub fn valid_snapshot() -> ConfigSnapshot {
    ConfigSnapshot::with_defaults()
}

/// The valid snapshot with a single key overridden, like setting one config value in a test.
#[must_use]
pub fn snapshot_with(path: &str, value: Value) -> ConfigSnapshot {
    valid_snapshot().with(path, value)
}

/// A valid document that exercises non-default values for every key.
#[must_use]
pub fn customised_document() -> Value {
    json!({
        "short-url": {
            "key_length": 8,
            "key_salt": "pepper",
            "tracking": {
                "default_enabled": false,
                "fields": {
                    "ip_address": false,
                    "browser": true,
                },
            },
            "disable_default_route": true,
            "enforce_https": false,
            "forward_query_params": true,
            "default_url": "https://sho.rt",
            "default_redirect_status_code": 307,
            "default_short_urls_table": "links",
            "default_short_url_visits_table": null,
            "validate_config": true,
        }
    })
}

/// Temporary directory holding configuration documents for a test.
#[derive(Debug)]
pub struct ConfigDir {
    dir: TempDir,
}

impl ConfigDir {
    /// Create an empty temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temporary config dir")?;
        Ok(Self { dir })
    }

    /// Write `contents` to `name` inside the directory and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Serialise `document` as pretty JSON into `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn write_json(&self, name: &str, document: &Value) -> Result<PathBuf> {
        let text = serde_json::to_string_pretty(document).context("failed to encode document")?;
        self.write(name, &text)
    }
}
