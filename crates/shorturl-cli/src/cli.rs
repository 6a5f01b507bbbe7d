//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shorturl_config::LoadOptions;
use shorturl_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, init_logging,
};

use crate::commands::{handle_check, handle_defaults, handle_show};
use crate::error::{CliError, CliResult, parse_exit_code};

/// Parse arguments, run the selected command, and return the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = parse_exit_code(&err);
            if let Err(io_err) = err.print() {
                eprintln!("error: failed to print usage: {io_err}");
            }
            return code;
        }
    };
    match execute(cli) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn execute(cli: Cli) -> CliResult<String> {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_version: env!("CARGO_PKG_VERSION"),
    };
    init_logging(&logging).map_err(CliError::failure)?;

    match cli.command {
        Command::Check(args) => handle_check(&args.source),
        Command::Show(args) => handle_show(&args.source, args.format),
        Command::Defaults(args) => handle_defaults(args.format),
    }
}

#[derive(Parser)]
#[command(
    name = "short-url-config",
    version,
    about = "Validate short URL configuration documents"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "SHORT_URL_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "SHORT_URL_LOG_FORMAT",
        value_name = "pretty|json",
        value_parser = parse_log_format
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration document.
    Check(CheckArgs),
    /// Validate a document and print the resolved settings.
    Show(ShowArgs),
    /// Print the documented defaults.
    Defaults(DefaultsArgs),
}

#[derive(Args)]
pub(crate) struct SourceArgs {
    #[arg(
        short = 'f',
        long = "file",
        env = "SHORT_URL_CONFIG",
        help = "Path to a JSON or YAML configuration document"
    )]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Check the document as-is instead of overlaying defaults")]
    pub(crate) no_defaults: bool,
}

impl SourceArgs {
    pub(crate) const fn load_options(&self) -> LoadOptions {
        LoadOptions {
            apply_defaults: !self.no_defaults,
        }
    }
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args)]
struct DefaultsArgs {
    #[arg(long, value_enum, default_value_t = DocumentFormatArg::Yaml)]
    format: DocumentFormatArg,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum DocumentFormatArg {
    #[default]
    Yaml,
    Json,
}

fn parse_log_format(value: &str) -> Result<LogFormat, TelemetryError> {
    value.parse()
}
