//! netjoin: scan for wireless networks and try candidate credentials on one.
//!
//! The binary runs against the in-memory simulated host described by the
//! `[simulation]` section of the config file.  Credential rounds are read from
//! `<credentials.directory>/1.txt`, `2.txt`, ... one candidate per line.
//!
//! # Usage
//!
//! ```text
//! netjoin [OPTIONS]
//!
//! Options:
//!   --config <PATH>             Config file [default: netjoin.toml]
//!   --credentials-dir <DIR>     Directory holding the round files
//!   --verify-delay-ms <MS>      Wait between join request and check
//!   --target <NAME>             Network to join [default: first scanned]
//!   --json                      Print notifications as JSON lines
//!   --log-level <LEVEL>         Log level when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Description                |
//! |--------------------------|----------------------------|
//! | `NETJOIN_CONFIG`         | Config file path           |
//! | `NETJOIN_CREDENTIALS_DIR`| Credential round directory |
//! | `NETJOIN_TARGET`         | Network to join            |
//!
//! CLI args take precedence over environment variables, which take precedence
//! over the config file.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use netjoin_app::application::join_attempt::{JoinAttemptController, JoinOutcome, JoinPrimitive};
use netjoin_app::application::scan_networks::{NetworkScanCoordinator, ScanPrimitive};
use netjoin_app::infrastructure::host::mock::MockWirelessHost;
use netjoin_app::infrastructure::notifications::{spawn_notification_pump, Notification};
use netjoin_app::infrastructure::storage::config::{load_config, AppConfig, DEFAULT_CONFIG_FILE};
use netjoin_core::NetworkDescriptor;

/// How long to wait for the host's scan results notification.
const SCAN_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of the trial event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Scan for networks and try candidate credentials against one of them.
#[derive(Debug, Parser)]
#[command(name = "netjoin", about = "Credential trial runner for wireless networks", version)]
struct Cli {
    /// Path of the TOML config file.  A missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "NETJOIN_CONFIG")]
    config: PathBuf,

    /// Directory holding the credential round files.
    #[arg(long, env = "NETJOIN_CREDENTIALS_DIR")]
    credentials_dir: Option<PathBuf>,

    /// Milliseconds between a join request and the connection check.
    #[arg(long)]
    verify_delay_ms: Option<u64>,

    /// Name of the network to join.  Defaults to the first scanned network.
    #[arg(long, env = "NETJOIN_TARGET")]
    target: Option<String>,

    /// Print notifications to stdout as JSON lines instead of logging them.
    #[arg(long)]
    json: bool,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Applies CLI overrides on top of the file config.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.credentials_dir {
            config.credentials.directory = dir.clone();
        }
        if let Some(ms) = self.verify_delay_ms {
            config.join.verify_delay_ms = ms;
        }
        if let Some(level) = &self.log_level {
            config.logging.log_level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    cli.apply_to(&mut config);

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    info!(
        "netjoin starting: credentials={}, simulated networks={}",
        config.credentials.directory.display(),
        config.simulation.networks.len()
    );

    let host = Arc::new(MockWirelessHost::new().with_networks(config.simulation.to_simulated_networks()));

    // ── Scan ──────────────────────────────────────────────────────────────────
    let mut coordinator = NetworkScanCoordinator::new(Arc::clone(&host) as Arc<dyn ScanPrimitive>);
    if let Err(e) = coordinator.start_scan() {
        Notification::from_scan_error(&e).log();
        return Err(e).context("could not start scan");
    }
    tokio::time::timeout(SCAN_TIMEOUT, coordinator.wait_for_results())
        .await
        .context("timed out waiting for scan results")??;
    coordinator.stop();

    let target = select_target(&coordinator, cli.target.as_deref())?;
    info!("selected network {target}");

    // ── Join ──────────────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, stopping after the current attempt");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let sequencer = config.credentials.build_sequencer();
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let pump = spawn_notification_pump(rx, cli.json);

    let mut controller = JoinAttemptController::new(
        sequencer,
        Arc::clone(&host) as Arc<dyn JoinPrimitive>,
        config.join.to_join_config(),
    )
    .with_events(tx);
    let report = controller.attempt(&target, &running).await;

    // Closing the channel lets the pump drain and finish.
    drop(controller);
    pump.await.context("notification pump panicked")?;

    match report.outcome {
        JoinOutcome::Succeeded { round, position } => info!(
            run_id = %report.run_id,
            "joined {} with candidate {position} of round {round} after {} attempts",
            report.network, report.attempts
        ),
        JoinOutcome::Exhausted => info!(
            run_id = %report.run_id,
            "no candidate joined {} after {} attempts",
            report.network, report.attempts
        ),
        JoinOutcome::Cancelled => info!(
            run_id = %report.run_id,
            "cancelled after {} attempts",
            report.attempts
        ),
    }

    Ok(())
}

/// Picks `requested` from the scan results, or the first network if `None`.
fn select_target(
    coordinator: &NetworkScanCoordinator,
    requested: Option<&str>,
) -> anyhow::Result<NetworkDescriptor> {
    match requested {
        Some(name) => coordinator
            .select(name)
            .with_context(|| format!("network '{name}' not found in scan results")),
        None => match coordinator.networks().first() {
            Some(first) => Ok(first.clone()),
            None => bail!("scan found no named networks"),
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["netjoin"]);

        assert_eq!(cli.config, PathBuf::from("netjoin.toml"));
        assert!(cli.target.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_overrides_replace_file_values() {
        // Arrange
        let cli = Cli::parse_from([
            "netjoin",
            "--credentials-dir",
            "/tmp/rounds",
            "--verify-delay-ms",
            "50",
            "--log-level",
            "debug",
        ]);
        let mut config = AppConfig::default();

        // Act
        cli.apply_to(&mut config);

        // Assert
        assert_eq!(config.credentials.directory, PathBuf::from("/tmp/rounds"));
        assert_eq!(config.join.verify_delay_ms, 50);
        assert_eq!(config.join.start_delay_ms, 100);
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_select_target_defaults_to_first_network() {
        let host = Arc::new(MockWirelessHost::new());
        let mut coordinator = NetworkScanCoordinator::new(host);
        coordinator.on_results(vec![NetworkDescriptor::new("Lab"), NetworkDescriptor::new("Office")]);

        let target = select_target(&coordinator, None).expect("first network");

        assert_eq!(target.name, "Lab");
    }

    #[test]
    fn test_select_target_unknown_name_is_an_error() {
        let host = Arc::new(MockWirelessHost::new());
        let mut coordinator = NetworkScanCoordinator::new(host);
        coordinator.on_results(vec![NetworkDescriptor::new("Lab")]);

        assert!(select_target(&coordinator, Some("Office")).is_err());
        assert!(select_target(&coordinator, Some("Lab")).is_ok());
    }
}
