//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde_json::{Map, Value};
use shorturl_config::ShortUrlSettings;

use crate::cli::{DocumentFormatArg, OutputFormat};
use crate::error::{CliError, CliResult};

pub(crate) fn render_settings(
    settings: &ShortUrlSettings,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(settings)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Table => Ok(settings_table(settings)),
    }
}

pub(crate) fn render_defaults(
    document: &Map<String, Value>,
    format: DocumentFormatArg,
) -> CliResult<String> {
    match format {
        DocumentFormatArg::Json => serde_json::to_string_pretty(document)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        DocumentFormatArg::Yaml => serde_yaml::to_string(document)
            .map(|text| text.trim_end().to_string())
            .map_err(|err| CliError::failure(anyhow!("failed to format YAML: {err}"))),
    }
}

fn settings_table(settings: &ShortUrlSettings) -> String {
    let mut lines = Vec::new();
    let mut row = |key: &str, value: &str| lines.push(format!("{key:<32} {value}"));

    row("key_length", &settings.key_length.to_string());
    row("key_salt", &settings.key_salt);
    row(
        "tracking.default_enabled",
        bool_label(settings.tracking.default_enabled),
    );
    for (field, enabled) in &settings.tracking.fields {
        row(&format!("tracking.fields.{field}"), bool_label(*enabled));
    }
    row(
        "disable_default_route",
        bool_label(settings.disable_default_route),
    );
    row("enforce_https", bool_label(settings.enforce_https));
    row(
        "forward_query_params",
        bool_label(settings.forward_query_params),
    );
    row(
        "default_url",
        settings.default_url.as_deref().unwrap_or("<app url>"),
    );
    row(
        "default_redirect_status_code",
        &settings.redirect_status.code().to_string(),
    );
    row("default_short_urls_table", &settings.tables.short_urls);
    row(
        "default_short_url_visits_table",
        &settings.tables.short_url_visits,
    );

    lines.join("\n")
}

const fn bool_label(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
