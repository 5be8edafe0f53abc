// crates/riskscore-cli/src/main.rs
// ============================================================================
// Module: Risk Score E2E CLI Entry Point
// Description: Command dispatcher for the vendor end-to-end scenario.
// Purpose: Run the scenario, check credentials, and validate configuration.
// Dependencies: clap, rand, riskscore-client, riskscore-config, riskscore-scenario, tokio
// ============================================================================

//! ## Overview
//! `riskscore-e2e run` executes the full scenario against the configured
//! vendor and exits non-zero when any step fails. `auth` performs only the
//! token exchange. `config validate` loads and validates the configuration
//! without network access. Credentials come from `RISKSCORE_CLIENT_ID` and
//! `RISKSCORE_CLIENT_SECRET`; the token itself is never printed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use riskscore_client::AuthToken;
use riskscore_client::AuthenticatedClient;
use riskscore_config::RiskScoreConfig;
use riskscore_config::credentials_from_env;
use riskscore_scenario::ScenarioRunner;
use thiserror::Error;

use crate::logging::init_tracing;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "riskscore-e2e", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full end-to-end scenario.
    Run(RunCommand),
    /// Exchange credentials for a token and report its type and lifetime.
    Auth(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration file.
    Validate(ConfigArgs),
}

/// Shared `--config` argument.
#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// Config file path (defaults to `RISKSCORE_CONFIG` or `riskscore.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `run`.
#[derive(clap::Args, Debug)]
struct RunCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Seed for notification and finding selection.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Write the canonical JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
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
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::Auth(args) => command_auth(&args).await,
        Commands::Config {
            command: ConfigCommand::Validate(args),
        } => command_config_validate(&args),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    init_tracing(&config.logging).map_err(|err| CliError::new(err.to_string()))?;
    let credentials = credentials_from_env().map_err(|err| CliError::new(err.to_string()))?;
    let client = build_client(&config)?;
    let mut runner = ScenarioRunner::new(client, credentials, config.scenario.step_settings())
        .with_cleanup_on_failure(config.scenario.cleanup_on_failure);
    let mut rng = selection_rng(command.seed);
    let plan = config.scenario.plan();
    tracing::info!(domain = %plan.domain, base_url = %config.api.base_url, "starting scenario");
    let outcome = runner.run(&plan, &mut rng).await;
    if let Some(path) = &command.report {
        outcome.report.write_to(path).map_err(|err| {
            CliError::new(format!("failed to write report {}: {err}", path.display()))
        })?;
    }
    write_stdout_line(&outcome.report.summary_line()).map_err(|err| output_error(&err))?;
    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `auth` command.
async fn command_auth(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    init_tracing(&config.logging).map_err(|err| CliError::new(err.to_string()))?;
    let credentials = credentials_from_env().map_err(|err| CliError::new(err.to_string()))?;
    let mut client = build_client(&config)?;
    let token = client
        .authenticate(&credentials)
        .await
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&token_summary(token)).map_err(|err| output_error(&err))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `config validate` command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    write_stdout_line(&format!("config valid: base_url={}", config.api.base_url))
        .map_err(|err| output_error(&err))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<RiskScoreConfig> {
    RiskScoreConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Builds the vendor client from the API section.
fn build_client(config: &RiskScoreConfig) -> CliResult<AuthenticatedClient> {
    let settings = config.api.client_settings().map_err(|err| CliError::new(err.to_string()))?;
    AuthenticatedClient::new(&settings).map_err(|err| CliError::new(err.to_string()))
}

/// Returns a seeded RNG when a seed is given, otherwise an entropy-seeded one.
fn selection_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Describes a token without revealing it.
fn token_summary(token: &AuthToken) -> String {
    format!(
        "token issued: type={} expires_in={}s",
        token.token_type(),
        token.expires_in().as_secs()
    )
}

/// Formats an output stream failure.
fn output_error(err: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write output: {err}"))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
