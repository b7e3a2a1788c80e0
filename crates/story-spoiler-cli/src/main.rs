// crates/story-spoiler-cli/src/main.rs
// ============================================================================
// Module: Story Spoiler CLI Entry Point
// Description: Command dispatcher for running and inspecting the harness.
// Purpose: Run the ordered Story API sequence and report per-step results.
// Dependencies: clap, story-spoiler-config, story-spoiler-core, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! `story-spoiler run` loads configuration, resolves a credential, runs every
//! step once in order and prints one line per step. The exit code is zero only
//! when every step passed. Diagnostics go to stderr through `tracing`; step
//! results go to stdout.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use story_spoiler_config::HarnessConfig;
use story_spoiler_core::RunReport;
use story_spoiler_core::ScenarioContext;
use story_spoiler_core::StepReport;
use story_spoiler_core::run_story_spoiler_suite;
use story_spoiler_core::story_spoiler_steps;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "STORY_SPOILER_LOG";
/// Filter used when `STORY_SPOILER_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "story_spoiler=info";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "story-spoiler", version, disable_help_subcommand = true)]
struct Cli {
    /// Diagnostic log format written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the story spoiler sequence against the configured API.
    Run(RunCommand),
    /// Print the ordered step catalog.
    Steps,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to `STORY_SPOILER_CONFIG` or `story-spoiler.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Story API base URL override.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Directory for `summary.json` and `summary.md`.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Validate {
        /// Config file path.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Diagnostic log formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::Steps => command_steps(),
        Commands::Config {
            command: ConfigCommand::Validate {
                config,
            },
        } => command_config_validate(config.as_deref()),
    }
}

/// Installs the stderr tracing subscriber.
fn init_logging(format: LogFormat) -> CliResult<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
        }
    };
    result.map_err(|err| CliError::new(format!("failed to initialize logging: {err}")))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the sequence and prints per-step results.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let mut config = HarnessConfig::load(command.config.as_deref()).map_err(config_error)?;
    apply_run_overrides(&mut config, command.base_url, command.report_dir)?;
    let settings = config.harness_settings().map_err(config_error)?;
    let report = run_story_spoiler_suite(&settings)
        .await
        .map_err(|err| CliError::new(format!("story spoiler run aborted: {err}")))?;
    for step in report.steps() {
        write_stdout(&format_step_line(step))?;
    }
    write_stdout(&format_summary_line(&report))?;
    if let Some(dir) = config.report_dir() {
        write_report(&report, &dir)?;
    }
    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Prints the ordered step catalog.
fn command_steps() -> CliResult<ExitCode> {
    for line in catalog_lines() {
        write_stdout(&line)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates configuration.
fn command_config_validate(path: Option<&Path>) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(path).map_err(config_error)?;
    let settings = config.harness_settings().map_err(config_error)?;
    write_stdout(&format!(
        "config ok: base_url={} credential={}",
        settings.base_url,
        settings.credential_source.label()
    ))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies command-line overrides on top of the loaded config.
fn apply_run_overrides(
    config: &mut HarnessConfig,
    base_url: Option<String>,
    report_dir: Option<PathBuf>,
) -> CliResult<()> {
    if base_url.is_none() && report_dir.is_none() {
        return Ok(());
    }
    if let Some(base_url) = base_url {
        config.api.base_url = base_url;
    }
    if let Some(report_dir) = report_dir {
        config.report.output_dir = Some(report_dir.to_string_lossy().into_owned());
    }
    config.validate().map_err(config_error)
}

/// Writes report artifacts and logs their paths.
fn write_report(report: &RunReport, dir: &Path) -> CliResult<()> {
    let paths = report.write_artifacts(dir).map_err(|err| {
        CliError::new(format!("failed to write report to {}: {err}", dir.display()))
    })?;
    for path in paths {
        info!(path = %path.display(), "report artifact written");
    }
    Ok(())
}

/// Renders one result line for a step.
fn format_step_line(step: &StepReport) -> String {
    let status = step.status.map_or_else(|| "-".to_string(), |status| status.to_string());
    let line = format!("{} {} {} {} -> {status}", step.order, step.name, step.method, step.path);
    match step.outcome.failure() {
        None => format!("[PASS] {line}"),
        Some(failure) => format!("[FAIL] {line}: {failure}"),
    }
}

/// Renders the run summary line.
fn format_summary_line(report: &RunReport) -> String {
    format!(
        "story spoiler: {}/{} steps passed",
        report.passed_count(),
        report.steps().len()
    )
}

/// Renders the step catalog as `order name METHOD expected-status` lines.
fn catalog_lines() -> Vec<String> {
    let context = ScenarioContext::new();
    story_spoiler_steps()
        .iter()
        .map(|step| {
            let request = (step.request)(&context);
            format!("{} {} {} {}", step.order, step.name, request.method, step.expected_status)
        })
        .collect()
}

/// Maps a config error into a CLI error.
fn config_error(err: story_spoiler_config::ConfigError) -> CliError {
    CliError::new(err.to_string())
}

/// Writes a line to stdout, mapping I/O failures into a [`CliError`].
fn write_stdout(message: &str) -> CliResult<()> {
    write_stdout_line(message)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
