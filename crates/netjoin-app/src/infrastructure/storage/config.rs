//! TOML-based configuration for the netjoin binary.
//!
//! Reads and writes `AppConfig` from a single file, `netjoin.toml` in the
//! working directory unless `--config` names another path.
//!
//! # Example file
//!
//! ```toml
//! [credentials]
//! directory = "credentials"
//! gap_tolerance = 1
//!
//! [join]
//! start_delay_ms = 100
//! verify_delay_ms = 1000
//!
//! [logging]
//! log_level = "info"
//!
//! [[simulation.networks]]
//! name = "Lab"
//! credential = "correct horse"
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = ...)]`, so a missing file, a missing
//! section, or a missing key all fall back to the values shown above.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use netjoin_core::{DirectoryCredentialSource, TrialSequencer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::join_attempt::JoinConfig;
use crate::infrastructure::host::mock::SimulatedNetwork;

/// File name used when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "netjoin.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub join: JoinTimingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Where credential rounds are read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialsConfig {
    /// Directory holding `1.txt`, `2.txt`, ...
    #[serde(default = "default_credentials_dir")]
    pub directory: PathBuf,
    /// Consecutive empty rounds skipped before the run is exhausted.
    #[serde(default = "default_gap_tolerance")]
    pub gap_tolerance: u32,
}

/// Trial loop timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinTimingConfig {
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Networks served by the mock host in simulation mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub networks: Vec<SimulatedNetworkEntry>,
}

/// One simulated network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatedNetworkEntry {
    pub name: String,
    /// Credential the network accepts; absent means it never accepts a join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_credentials_dir() -> PathBuf {
    PathBuf::from("credentials")
}
fn default_gap_tolerance() -> u32 {
    netjoin_core::DEFAULT_GAP_TOLERANCE
}
fn default_start_delay_ms() -> u64 {
    100
}
fn default_verify_delay_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            directory: default_credentials_dir(),
            gap_tolerance: default_gap_tolerance(),
        }
    }
}

impl Default for JoinTimingConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay_ms(),
            verify_delay_ms: default_verify_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl CredentialsConfig {
    /// A sequencer reading rounds from `directory` with the configured gap
    /// tolerance.
    pub fn build_sequencer(&self) -> TrialSequencer {
        let source = DirectoryCredentialSource::new(self.directory.clone());
        TrialSequencer::new(Arc::new(source)).with_gap_tolerance(self.gap_tolerance)
    }
}

impl JoinTimingConfig {
    /// The timing as used by the join controller.
    pub fn to_join_config(&self) -> JoinConfig {
        JoinConfig {
            start_delay: Duration::from_millis(self.start_delay_ms),
            verify_delay: Duration::from_millis(self.verify_delay_ms),
        }
    }
}

impl SimulationConfig {
    /// The networks in the form the mock host takes.
    pub fn to_simulated_networks(&self) -> Vec<SimulatedNetwork> {
        self.networks
            .iter()
            .map(|entry| SimulatedNetwork {
                name: entry.name.clone(),
                credential: entry.credential.clone(),
            })
            .collect()
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
