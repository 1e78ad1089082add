//! Argument parsing, profile loading and command dispatch.

use std::path::{Path, PathBuf};

use cirrus_config::{ClientProfile, PROFILE_PATH_ENV, load_with_lookup};
use cirrus_core::RepresentationKind;
use cirrus_core::representation::UnknownRepresentationKind;
use cirrus_telemetry::{LogFormat, LoggingConfig, TelemetryError, build_sha, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::commands::{hints::handle_hints, inspect::handle_inspect};
use crate::error::{CliError, CliResult};

const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, executes the requested command and prints its output.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    let trace_id = Uuid::new_v4();
    let span = info_span!(
        "cli",
        command = cli.command.label(),
        trace_id = %trace_id,
        build_sha = %build_sha(),
    );
    match dispatch(cli).instrument(span).await {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<String> {
    let profile = load_profile(cli.profile.as_deref()).await?;
    match cli.command {
        Command::Inspect(args) => handle_inspect(&profile, args, cli.output),
        Command::Hints(args) => handle_hints(&profile, &args, cli.output),
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        build_sha: env!("CARGO_PKG_VERSION"),
    })
    .map_err(CliError::failure)
}

/// Resolve the profile: `--profile` wins over the environment document.
async fn load_profile(path: Option<&Path>) -> CliResult<ClientProfile> {
    let explicit = path.map(|path| path.display().to_string());
    let profile = load_with_lookup(|key| {
        if key == PROFILE_PATH_ENV && explicit.is_some() {
            return explicit.clone();
        }
        std::env::var(key).ok()
    })
    .await?;
    Ok(profile)
}

#[derive(Parser)]
#[command(name = "cirrus", about = "Inspect file representation requests")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        help = "JSON profile document (defaults to $CIRRUS_PROFILE)"
    )]
    profile: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "CIRRUS_LOG_LEVEL",
        default_value = DEFAULT_CLI_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "CIRRUS_LOG_FORMAT",
        value_parser = parse_log_format,
        default_value = "auto"
    )]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the wire request a file fetch would send.
    Inspect(InspectArgs),
    /// Show the representation hint table or parse a hints header.
    Hints(HintsArgs),
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Inspect(_) => "inspect",
            Self::Hints(_) => "hints",
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct InspectArgs {
    #[arg(help = "File identifier")]
    pub(crate) file_id: String,
    #[arg(long, help = "Look the file up in the trash")]
    pub(crate) trashed: bool,
    #[arg(
        long = "rep",
        value_parser = parse_kind,
        help = "Representation kind to request (repeatable)"
    )]
    pub(crate) representations: Vec<RepresentationKind>,
    #[arg(long, help = "Request only the best kind the file supports")]
    pub(crate) match_supported: bool,
    #[arg(
        long = "supported",
        value_parser = parse_kind,
        help = "Kind the file is known to support (repeatable)"
    )]
    pub(crate) supported: Vec<RepresentationKind>,
    #[arg(long, help = "Request every file attribute")]
    pub(crate) all_fields: bool,
    #[arg(long = "etag", help = "Etag already held by the caller (repeatable)")]
    pub(crate) etags: Vec<String>,
    #[arg(long, help = "Background transfer correlation key")]
    pub(crate) associate_id: Option<String>,
    #[arg(long, help = "Background transfer payload directory")]
    pub(crate) directory: Option<PathBuf>,
    #[arg(long, help = "Shared link URL")]
    pub(crate) shared_link: Option<String>,
    #[arg(long, requires = "shared_link", help = "Shared link password")]
    pub(crate) shared_link_password: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct HintsArgs {
    #[arg(long, help = "Hints header value to decode")]
    pub(crate) parse: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_kind(value: &str) -> Result<RepresentationKind, UnknownRepresentationKind> {
    value.trim().parse()
}

fn parse_log_format(value: &str) -> Result<LogFormat, TelemetryError> {
    value.trim().parse()
}
