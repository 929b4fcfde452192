//! vinput agent — entry point.
//!
//! Creates a virtual keyboard and mouse through `/dev/uinput`, verifies it with
//! an empty pointer move, and keeps it alive until Ctrl+C or SIGTERM, at which
//! point the device is destroyed exactly once.
//!
//! # Usage
//!
//! ```text
//! vinput-agent [OPTIONS]
//!
//! Options:
//!   --config <PATH>       TOML config file
//!   --device-path <PATH>  uinput node [default: /dev/uinput]
//!   --device-name <NAME>  name the kernel shows for the device
//!   --settle-ms <MS>      pressAndRelease settle delay [default: 50]
//!   --serialize-actions [<BOOL>]
//!                         run concurrent actions one at a time [bare flag: true]
//!   --list-keys           print the status snapshot (key names) as JSON and exit
//!   --print-config        print the effective configuration as TOML and exit
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.  Either one overrides the
//! config file, which overrides the built-in defaults.
//!
//! | Variable                   | Default       | Description                 |
//! |----------------------------|---------------|-----------------------------|
//! | `VINPUT_CONFIG`            | (none)        | TOML config file            |
//! | `VINPUT_DEVICE_PATH`       | `/dev/uinput` | uinput node                 |
//! | `VINPUT_DEVICE_NAME`       | (config)      | Device name                 |
//! | `VINPUT_SETTLE_MS`         | `50`          | pressAndRelease delay in ms |
//! | `VINPUT_SERIALIZE_ACTIONS` | (config)      | `true` / `false`            |
//!
//! # Architecture overview
//!
//! ```text
//! main()
//!  └─ Cli::into_agent_config()      defaults ← file ← env ← flags
//!  └─ UinputFile::open()            O_WRONLY | O_NONBLOCK
//!  └─ DeviceChannel::register()     capabilities → identity → create
//!  └─ serve()
//!      └─ InputActions::move_mouse(0,0)  startup write check
//!      └─ wait for Ctrl+C / SIGTERM
//!      └─ DeviceChannel::close()         UI_DEV_DESTROY, handle released
//! ```

use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vinput_agent::application::input_actions::InputActions;
use vinput_agent::application::status::StatusReport;
use vinput_agent::infrastructure::config::{load_from_path, AgentConfig};
use vinput_agent::infrastructure::device_channel::{DeviceChannel, UinputBackend};
use vinput_core::keymap::KeySymbolTable;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Virtual keyboard and mouse over Linux uinput.
#[derive(Debug, Parser)]
#[command(
    name = "vinput-agent",
    about = "Virtual keyboard and mouse over the Linux uinput facility",
    version
)]
struct Cli {
    /// TOML config file.  Must exist when given.
    #[arg(long, env = "VINPUT_CONFIG")]
    config: Option<PathBuf>,

    /// Path of the uinput node.
    #[arg(long, env = "VINPUT_DEVICE_PATH")]
    device_path: Option<PathBuf>,

    /// Name the kernel reports for the virtual device.
    #[arg(long, env = "VINPUT_DEVICE_NAME")]
    device_name: Option<String>,

    /// Delay in milliseconds between the hold and release frames of
    /// pressAndRelease.
    #[arg(long, env = "VINPUT_SETTLE_MS")]
    settle_ms: Option<u64>,

    /// Serialize whole actions across concurrent callers.  A bare flag means
    /// `true`; `--serialize-actions false` overrides a config file that
    /// turns it on.
    #[arg(
        long,
        env = "VINPUT_SERIALIZE_ACTIONS",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    serialize_actions: Option<bool>,

    /// Print the status snapshot, including every key name, as JSON and exit.
    #[arg(long)]
    list_keys: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Merges the config file (if any) with the CLI/env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that cannot be read or
    /// parsed.
    fn into_agent_config(self) -> anyhow::Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => load_from_path(path)?,
            None => AgentConfig::default(),
        };

        if let Some(path) = self.device_path {
            config.device_path = path;
        }
        if let Some(name) = self.device_name {
            config.identity.name = name;
        }
        if let Some(ms) = self.settle_ms {
            config.settle_delay_ms = ms;
        }
        if let Some(serialize) = self.serialize_actions {
            config.serialize_actions = serialize;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` picks the level
///    (default `info`).
/// 2. CLI arguments are parsed and merged with the config file.
/// 3. `--print-config` / `--list-keys` answer and exit without touching
///    the device.
/// 4. Otherwise the device is registered, checked with an empty pointer
///    move, and kept alive until a termination signal arrives.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Parse CLI arguments ───────────────────────────────────────────────────
    let cli = Cli::parse();
    let (list_keys, print_config) = (cli.list_keys, cli.print_config);
    let config = cli.into_agent_config()?;

    if print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    if list_keys {
        println!(
            "{}",
            StatusReport::from_table(&KeySymbolTable::new()).to_json()?
        );
        return Ok(());
    }

    run(config).await
}

#[cfg(target_os = "linux")]
async fn run(config: AgentConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use vinput_agent::application::synthesizer::EventSink;
    use vinput_agent::infrastructure::device_channel::linux::UinputFile;
    use vinput_core::CapabilitySet;

    info!(
        "vinput agent starting — device={}, name={:?}",
        config.device_path.display(),
        config.identity.bounded_name()
    );

    // ── Device registration ───────────────────────────────────────────────────
    let table = KeySymbolTable::new();
    let caps = CapabilitySet::from_table(&table);

    let file = UinputFile::open(&config.device_path).context("cannot open uinput device")?;
    let channel = Arc::new(DeviceChannel::new(file));
    channel
        .register(&caps, &config.identity)
        .context("failed to register virtual input device")?;

    let actions = InputActions::new(Arc::clone(&channel) as Arc<dyn EventSink>, table)
        .with_settle_delay(config.settle_delay())
        .serialized(config.serialize_actions);

    serve(&channel, &actions, wait_for_shutdown()).await?;

    info!("vinput agent stopped");
    Ok(())
}

/// Verifies a registered device, then keeps it alive until `shutdown`
/// resolves.
///
/// The channel is closed exactly once on every path out of this function:
/// when the startup write fails, when `shutdown` resolves, and when
/// `shutdown` itself fails.
///
/// # Errors
///
/// Returns an error if the startup write is rejected or `shutdown` fails.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
async fn serve<B, F>(
    channel: &DeviceChannel<B>,
    actions: &InputActions,
    shutdown: F,
) -> anyhow::Result<()>
where
    B: UinputBackend,
    F: Future<Output = anyhow::Result<()>>,
{
    // ── Startup check ─────────────────────────────────────────────────────────
    // A zero move is a bare SYN frame: proves the write path without moving
    // the pointer.
    if let Err(e) = actions.move_mouse(0, 0) {
        channel.close();
        return Err(e).context("virtual input device rejected the startup write");
    }

    let status = StatusReport::running(actions);
    info!(
        keys = status.available_keys.len(),
        serialized = actions.is_serialized(),
        "virtual input device ready"
    );
    if let Ok(json) = status.to_json() {
        debug!("status: {json}");
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    let waited = shutdown.await;
    channel.close();
    waited
}

#[cfg(not(target_os = "linux"))]
async fn run(_config: AgentConfig) -> anyhow::Result<()> {
    anyhow::bail!("the uinput virtual device is only available on Linux")
}

/// Resolves on the first of Ctrl+C (SIGINT) or SIGTERM.
#[cfg(target_os = "linux")]
async fn wait_for_shutdown() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl+C")?;
            info!("received Ctrl+C — shutting down");
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM — shutting down");
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
