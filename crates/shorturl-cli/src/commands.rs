//! Command handlers. Each returns the text to print on success.

use anyhow::Context;
use shorturl_config::{ConfigSnapshot, ShortUrlSettings, defaults, load_snapshot, validate_config};
use tracing::info;

use crate::cli::{DocumentFormatArg, OutputFormat, SourceArgs};
use crate::error::{CliError, CliResult};
use crate::output::{render_defaults, render_settings};

pub(crate) fn handle_check(source: &SourceArgs) -> CliResult<String> {
    let snapshot = load(source)?;
    validate_config(&snapshot).map_err(|err| CliError::validation(err.message()))?;
    info!(path = %source.file.display(), "configuration is valid");
    Ok("ok".to_string())
}

pub(crate) fn handle_show(source: &SourceArgs, format: OutputFormat) -> CliResult<String> {
    let snapshot = load(source)?;
    let settings = ShortUrlSettings::from_source(&snapshot)?;
    render_settings(&settings, format)
}

pub(crate) fn handle_defaults(format: DocumentFormatArg) -> CliResult<String> {
    render_defaults(&defaults::default_document(), format)
}

fn load(source: &SourceArgs) -> CliResult<ConfigSnapshot> {
    load_snapshot(&source.file, source.load_options())
        .with_context(|| format!("failed to load {}", source.file.display()))
        .map_err(CliError::failure)
}
