//! CLI interface for enrich.
//!
//! One command: read identifiers, look each one up under the rate limit,
//! write the enriched rows. Arguments in, one document out. Progress and
//! the final summary go to stderr so stdout can carry the document.

mod format;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::batch::BatchRunner;
use crate::config::{Config, ConfigError};
use crate::credential::resolve_api_key;
use crate::input::read_identifiers;
use crate::lookup::{DEFAULT_BASE_URL, FullContactClient, LookupClient};
use crate::model::LookupKind;
use crate::rate::{DEFAULT_REQUESTS_PER_MINUTE, RateLimiter};
use crate::sink::{Destination, FailureRendering, OutputFormat, OutputSink, ResultSink};

use format::{format_failures, format_summary};

/// Per-request timeout used when the config file does not set one.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Enrich a list of identifiers with person data.
#[derive(Debug, Parser)]
#[command(name = "enrich", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    /// File of identifiers, one per line. Use `-` for stdin.
    file: PathBuf,

    /// Provider API key. Falls back to `ENRICH_API_KEY`, then `~/.enrich/config.toml`.
    #[arg(short = 'k', long = "api-key")]
    api_key: Option<String>,

    /// What each line of the input is.
    #[arg(short, long, value_enum, ignore_case = true, default_value = "email")]
    lookup: LookupKindArg,

    /// Output file. Use `-` for stdout.
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Output format. Defaults to the output file's extension (`.csv` or JSON).
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Lookups allowed per minute. Defaults to 300.
    #[arg(short, long, allow_negative_numbers = true)]
    rate_limit: Option<i64>,

    /// How failed lookups appear in the output.
    #[arg(long, value_enum)]
    failures: Option<FailuresArg>,

    /// Rewrite the output after every completed lookup.
    #[arg(long)]
    incremental: bool,

    /// Provider base URL.
    #[arg(long)]
    base_url: Option<String>,
}

const USAGE_HELP: &str = r"Examples:
  enrich emails.txt -k $KEY
  enrich phones.txt -l phone -o people.csv --rate-limit 60
  cat handles.txt | enrich - -l twitter -o - --failures omit

Config (~/.enrich/config.toml, all keys optional):
  api-key = '...'
  requests-per-minute = 300
  failures = 'sentinel'   # or 'omit'
  incremental = false";

/// CLI-facing lookup kind, mapped to the domain `LookupKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LookupKindArg {
    /// Email addresses.
    Email,
    /// Phone numbers.
    Phone,
    /// Twitter handles.
    Twitter,
}

impl LookupKindArg {
    fn to_domain(self) -> LookupKind {
        match self {
            Self::Email => LookupKind::Email,
            Self::Phone => LookupKind::Phone,
            Self::Twitter => LookupKind::Twitter,
        }
    }
}

/// CLI-facing output format, mapped to the domain `OutputFormat`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// JSON array of objects.
    Json,
    /// CSV with a header row.
    Csv,
}

impl FormatArg {
    fn to_domain(self) -> OutputFormat {
        match self {
            Self::Json => OutputFormat::Json,
            Self::Csv => OutputFormat::Csv,
        }
    }
}

/// CLI-facing failure rendering, mapped to the domain `FailureRendering`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FailuresArg {
    /// Keep a row of empty fields with an `error` column.
    Sentinel,
    /// Leave failed identifiers out.
    Omit,
}

impl FailuresArg {
    fn to_domain(self) -> FailureRendering {
        match self {
            Self::Sentinel => FailureRendering::Sentinel,
            Self::Omit => FailureRendering::Omit,
        }
    }
}

/// Everything a batch needs, resolved from flags and config.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    api_key: String,
    kind: LookupKind,
    limiter: RateLimiter,
    destination: Destination,
    format: OutputFormat,
    failures: FailureRendering,
    incremental: bool,
    base_url: String,
    timeout: Duration,
}

impl Settings {
    /// Merge flags over config. Any invalid value stops here, before a lookup.
    fn resolve(cli: &Cli, config: &Config) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(cli.api_key.as_deref(), config)?;
        let limiter = RateLimiter::new(
            cli.rate_limit
                .or(config.requests_per_minute)
                .unwrap_or(DEFAULT_REQUESTS_PER_MINUTE),
        )?;

        let destination = Destination::parse(&cli.output);
        let format = cli
            .format
            .map_or_else(|| OutputFormat::from_path(&cli.output), FormatArg::to_domain);
        let failures = cli
            .failures
            .map(FailuresArg::to_domain)
            .or(config.failures)
            .unwrap_or_default();

        let mut incremental = cli.incremental || config.incremental.unwrap_or(false);
        if incremental && destination == Destination::Stdout {
            tracing::warn!("incremental output needs a file; writing once to stdout");
            incremental = false;
        }

        Ok(Self {
            api_key,
            kind: cli.lookup.to_domain(),
            limiter,
            destination,
            format,
            failures,
            incremental,
            base_url: cli
                .base_url
                .clone()
                .or_else(|| config.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// Run the CLI, returning an error message on failure.
pub async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| e.to_string())?;
    let settings = Settings::resolve(&cli, &config).map_err(|e| e.to_string())?;
    cmd_enrich(&cli.file, settings).await
}

async fn cmd_enrich(file: &std::path::Path, settings: Settings) -> Result<(), String> {
    let identifiers = read_identifiers(file, settings.kind).map_err(|e| e.to_string())?;

    let client: Arc<dyn LookupClient> = Arc::new(
        FullContactClient::new(settings.api_key, &settings.base_url, settings.timeout)
            .map_err(|e| e.to_string())?,
    );
    let sink: Arc<dyn ResultSink> = Arc::new(OutputSink::new(
        settings.destination.clone(),
        settings.format,
        settings.failures,
    ));

    tracing::info!(
        count = identifiers.len(),
        kind = %settings.kind,
        requests_per_minute = settings.limiter.requests_per_minute(),
        interval_ms = u64::try_from(settings.limiter.interval().as_millis()).unwrap_or(u64::MAX),
        destination = %settings.destination,
        "starting batch"
    );

    let runner = BatchRunner::new(client, settings.limiter).incremental(settings.incremental);
    let result = runner
        .run(&identifiers, sink)
        .await
        .map_err(|e| e.to_string())?;

    if result.is_empty() {
        tracing::warn!(file = %file.display(), "no identifiers in input");
    }

    for line in format_failures(&result) {
        eprintln!("{line}");
    }
    eprintln!(
        "{}",
        format_summary(&result, settings.kind, &settings.destination, settings.failures)
    );

    Ok(())
}
