//! routecheck: pre-upgrade health-check runner.
//!
//! Loads the device inventory and command lists, connects to each device
//! over SSH, runs the pre-check pipeline and writes the JSON artifacts.
//! Exits 0 only when every device connected and every parser succeeded.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use routecheck::config::{CommandLists, DeviceConfig, Inventory};
use routecheck::error::Result;
use routecheck::pipeline::{Phase, RunContext, run_pipeline};
use routecheck::registry::ParserRegistry;
use routecheck::report;
use routecheck::transport::{CliSession, HostKeyVerification, SshConfig, SshSession};

#[derive(Debug, Parser)]
#[command(name = "routecheck", version, about = "Pre-upgrade router health checks over SSH")]
struct Cli {
    /// Device inventory YAML (hosts, credentials, vendor, model).
    #[arg(long, default_value = "inputs/deviceDetails.yaml")]
    inventory: PathBuf,

    /// Per-device command list YAML.
    #[arg(long, default_value = "inputs/show_cmd_list.yaml")]
    commands: PathBuf,

    /// Directory for the per-command artifact files.
    #[arg(long, default_value = "pre_checks")]
    output_dir: PathBuf,

    /// Directory for the run summary export.
    #[arg(long, default_value = "precheck_jsons")]
    summary_dir: PathBuf,

    /// Host key checking mode.
    #[arg(long, value_enum, default_value_t = HostKeyMode::AcceptNew)]
    host_key_checking: HostKeyMode,

    /// Connect / per-command prompt timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HostKeyMode {
    Strict,
    AcceptNew,
    Disabled,
}

impl From<HostKeyMode> for HostKeyVerification {
    fn from(mode: HostKeyMode) -> Self {
        match mode {
            HostKeyMode::Strict => HostKeyVerification::Strict,
            HostKeyMode::AcceptNew => HostKeyVerification::AcceptNew,
            HostKeyMode::Disabled => HostKeyVerification::Disabled,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("fatal: {e}");
            eprintln!("routecheck: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run pre-checks for every inventory device. Returns true iff every
/// device connected and parsed cleanly.
async fn run(cli: &Cli) -> Result<bool> {
    let registry = Arc::new(ParserRegistry::build()?);
    let inventory = Inventory::load(&cli.inventory)?;
    let command_lists = CommandLists::load(&cli.commands)?;

    info!(
        "loaded {} device(s), {} parser(s) registered",
        inventory.devices.len(),
        registry.len()
    );

    let mut all_ok = true;

    for device in &inventory.devices {
        match check_device(cli, &registry, &command_lists, device).await {
            Ok(parse_ok) => {
                if !parse_ok {
                    warn!(
                        "[{}] one or more parsers failed, see summary",
                        device.device_key()
                    );
                }
                all_ok &= parse_ok;
            }
            Err(e) => {
                error!("[{}] device run failed: {e}", device.device_key());
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

/// Pre-check one device end to end: connect, pipeline, artifacts.
async fn check_device(
    cli: &Cli,
    registry: &Arc<ParserRegistry>,
    command_lists: &CommandLists,
    device: &DeviceConfig,
) -> Result<bool> {
    let device_key = device.device_key();
    let vendor = device.vendor()?;
    let commands = command_lists.commands_for(&device_key)?;

    let mut ctx = RunContext::new(&device_key, vendor, device.model.to_lowercase());
    ctx.tracker.set_host(&device_key, &device.host);
    ctx.tracker.log_task(
        &device_key,
        "pre-checks",
        "read Yaml",
        "Success",
        "",
        "device inventory and command list loaded",
    );
    ctx.tracker
        .log_task(&device_key, "pre-checks", "start logger", "Success", "", "");

    let config = SshConfig::new(&device.host, &device.username)
        .with_secret(device.password.clone())
        .with_port(device.port)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_host_key_verification(cli.host_key_checking.into());

    let mut session = match SshSession::connect(config).await {
        Ok(session) => {
            mark_connected(&mut ctx, &device_key, &device.host);
            session
        }
        Err(e) => {
            ctx.tracker.log_task(
                &device_key,
                "pre-checks",
                "connection using credentials",
                "Failed",
                &format!("{}: {e}", device.host),
                "",
            );
            report::export_run_summary(&cli.summary_dir, &ctx, Phase::Pre)?;
            return Err(e);
        }
    };

    info!("[{device_key}] running {} pre-check command(s)", commands.len());
    let parse_ok = run_pipeline(&mut session, registry, &mut ctx, commands, Phase::Pre).await;

    if let Err(e) = session.close().await {
        warn!("[{device_key}] disconnect failed: {e}");
    }

    report::write_phase_artifacts(&cli.output_dir, &ctx, Phase::Pre)?;
    report::export_run_summary(&cli.summary_dir, &ctx, Phase::Pre)?;

    Ok(parse_ok)
}

/// Mark the connection-time tasks once the SSH session is up. The version
/// banner read during login doubles as the "show version" check.
fn mark_connected(ctx: &mut RunContext, device_key: &str, host: &str) {
    ctx.tracker.log_task(
        device_key,
        "pre-checks",
        "connection using credentials",
        "Success",
        "",
        &format!("{host}: connected"),
    );
    ctx.tracker.log_task(
        device_key,
        "pre-checks",
        "show version",
        "Success",
        "",
        "version information retrieved",
    );
}
