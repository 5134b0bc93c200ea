// crates/fingerprint-beacon-cli/src/main.rs
// ============================================================================
// Module: Fingerprint Beacon CLI Entry Point
// Description: Command dispatcher for fingerprint runs and inspection.
// Purpose: Activation entry point for hosts plus config and profile tooling.
// Dependencies: clap, fingerprint-beacon-config, fingerprint-beacon-core, serde, thiserror, tokio.
// ============================================================================

//! ## Overview
//! `fingerprint-beacon run` performs one activation: resolve a profile, run
//! its engines, deliver the envelope, and print `{envelope, submission}` as
//! JSON. Only configuration failures produce a non-success exit code; engine
//! and delivery failures are reported inside the printed result.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use fingerprint_beacon_cli::wiring;
use fingerprint_beacon_cli::wiring::Delivery;
use fingerprint_beacon_config::FingerprintBeaconConfig;
use fingerprint_beacon_config::config_toml_example;
use fingerprint_beacon_core::ActivationOutcome;
use fingerprint_beacon_core::ActivationSession;
use fingerprint_beacon_core::OriginId;
use fingerprint_beacon_core::ProfileId;
use fingerprint_beacon_core::ProfileRegistry;
use fingerprint_beacon_core::RunError;
use fingerprint_beacon_core::RunReport;
use fingerprint_beacon_core::SkipReason;
use fingerprint_beacon_core::SubmissionOutcome;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "fingerprint-beacon", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one fingerprint activation and print the result.
    Run(RunCommand),
    /// Profile document inspection.
    Profiles {
        /// Selected profiles subcommand.
        #[command(subcommand)]
        command: ProfilesCommand,
    },
    /// Engine registry inspection.
    Engines {
        /// Selected engines subcommand.
        #[command(subcommand)]
        command: EnginesCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Shared `--config` flag.
#[derive(Args, Debug, Clone)]
struct ConfigArg {
    /// Config file path (defaults to `FINGERPRINT_BEACON_CONFIG` or `fingerprint-beacon.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArg,
    /// Force a profile instead of the document default.
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,
    /// Origin identifier (overrides `submission.origin`).
    #[arg(long, value_name = "ORIGIN")]
    origin: Option<String>,
    /// Log requests to stderr instead of sending them.
    #[arg(long, conflicts_with = "no_submit")]
    dry_run: bool,
    /// Skip delivery entirely.
    #[arg(long)]
    no_submit: bool,
}

/// Profiles subcommands.
#[derive(Subcommand, Debug)]
enum ProfilesCommand {
    /// List profile identifiers and the default.
    List(ConfigArg),
    /// Show one profile's engines and hash strategy.
    Show(ProfilesShowCommand),
}

/// Arguments for `profiles show`.
#[derive(Args, Debug)]
struct ProfilesShowCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArg,
    /// Profile identifier.
    profile: String,
}

/// Engines subcommands.
#[derive(Subcommand, Debug)]
enum EnginesCommand {
    /// List registered engines and whether policy allows them.
    List(ConfigArg),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigArg),
    /// Print the canonical example configuration.
    Example,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Printed result of `run`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RunOutput {
    /// Completed activation.
    Completed(RunReport),
    /// Skipped activation.
    Skipped {
        /// Skip reason label.
        skipped: &'static str,
    },
}

/// Printed result of `profiles list`.
#[derive(Debug, Serialize)]
struct ProfilesListing<'a> {
    /// Document default profile.
    default: &'a ProfileId,
    /// All profile identifiers.
    profiles: Vec<&'a ProfileId>,
}

/// One row of `engines list`.
#[derive(Debug, Serialize)]
struct EngineListing {
    /// Engine identifier.
    engine: String,
    /// Whether the access policy permits it.
    allowed: bool,
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
        Commands::Profiles {
            command,
        } => command_profiles(command).await,
        Commands::Engines {
            command: EnginesCommand::List(config),
        } => command_engines_list(&config),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes `run`.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let delivery = Delivery::select(&config, command.dry_run, command.no_submit);
    let audit = wiring::audit_sink(&config.audit).map_err(wiring_error)?;
    let runner = wiring::build_runner(&config, delivery, audit).map_err(wiring_error)?;
    let profile = command.profile.as_deref();

    let output = if delivery == Delivery::Disabled {
        let envelope = runner.run_fingerprint(profile).await.map_err(run_error)?;
        RunOutput::Completed(RunReport {
            envelope,
            submission: SubmissionOutcome::Disabled,
        })
    } else {
        let origin = resolve_origin(command.origin.as_deref(), config.submission.origin_id());
        let session = ActivationSession::new(origin);
        match runner.activate(&session, profile).await.map_err(run_error)? {
            ActivationOutcome::Completed(report) => RunOutput::Completed(report),
            ActivationOutcome::Skipped(reason) => RunOutput::Skipped {
                skipped: skip_label(reason),
            },
        }
    };
    write_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

/// Prefers the command-line origin over the configured one.
fn resolve_origin(flag: Option<&str>, configured: Option<OriginId>) -> Option<OriginId> {
    flag.map(str::trim).filter(|origin| !origin.is_empty()).map(OriginId::new).or(configured)
}

/// Label printed for a skipped activation.
const fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::MissingOrigin => "missing_origin",
        SkipReason::AlreadySent => "already_sent",
    }
}

// ============================================================================
// SECTION: Inspection Commands
// ============================================================================

/// Dispatches `profiles` subcommands.
async fn command_profiles(command: ProfilesCommand) -> CliResult<ExitCode> {
    match command {
        ProfilesCommand::List(config) => {
            let registry = load_profiles(&config).await?;
            write_json(&ProfilesListing {
                default: registry.default_profile_id(),
                profiles: registry.profile_ids().collect(),
            })?;
        }
        ProfilesCommand::Show(command) => {
            let registry = load_profiles(&command.config).await?;
            let spec = registry
                .document()
                .profiles
                .get(&ProfileId::new(command.profile.as_str()))
                .ok_or_else(|| CliError::new(format!("profile not found: {}", command.profile)))?;
            write_json(spec)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `engines list`.
fn command_engines_list(config: &ConfigArg) -> CliResult<ExitCode> {
    let config = load_config(config)?;
    let registry = wiring::engine_registry(&config).map_err(wiring_error)?;
    let listing: Vec<EngineListing> = registry
        .engine_ids()
        .map(|engine| EngineListing {
            engine: engine.to_string(),
            allowed: registry.policy().is_allowed(engine.as_str()),
        })
        .collect();
    write_json(&listing)?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatches `config` subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(config) => {
            load_config(config)?;
            write_stdout_line("config ok")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Loading Helpers
// ============================================================================

/// Loads and validates the config file.
fn load_config(arg: &ConfigArg) -> CliResult<FingerprintBeaconConfig> {
    FingerprintBeaconConfig::load(arg.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Loads the profile document named by the config.
async fn load_profiles(arg: &ConfigArg) -> CliResult<ProfileRegistry> {
    let config = load_config(arg)?;
    let source = wiring::profile_source(&config.profiles).map_err(wiring_error)?;
    ProfileRegistry::load(source.as_ref())
        .await
        .map_err(|err| CliError::new(format!("failed to load profiles: {err}")))
}

/// Maps wiring failures.
fn wiring_error(err: wiring::WiringError) -> CliError {
    CliError::new(format!("failed to build runner: {err}"))
}

/// Maps run failures.
fn run_error(err: RunError) -> CliError {
    CliError::new(format!("fingerprint run failed: {err}"))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes `value` as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
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

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
