//! CLI error type and exit code mapping.

use std::fmt::{self, Display, Formatter};

use shorturl_config::ConfigError;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

/// Exit code for a command line clap rejected.
pub(crate) const USAGE_EXIT_CODE: i32 = 64;

/// Exit code for a clap parse error. Help and version output count as success.
pub(crate) fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { USAGE_EXIT_CODE } else { 0 }
}

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err.as_validation() {
            Some(rule) => Self::validation(rule.message()),
            None => Self::failure(err),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}
