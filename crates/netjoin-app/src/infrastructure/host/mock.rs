//! Mock wireless host for unit testing and simulation.
//!
//! # Why a mock host?
//!
//! Real wireless adapters need a radio, OS permissions, and networks in range,
//! and their effects cannot be observed from Rust test code.  The
//! `MockWirelessHost` replaces all of that with in-memory state:
//!
//! - A list of simulated networks, each with the credential it accepts.
//! - A record of every join request, in order.
//! - The "active network" the host would report after a join.
//! - The scan-results subscribers, notified synchronously by `start_scan`.
//!
//! Like real hosts, the mock reports the active network name wrapped in double
//! quotes.
//!
//! # Usage in tests
//!
//! ```ignore
//! let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("secret2")));
//! let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;
//! assert_eq!(host.join_count(), 2);
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use netjoin_core::NetworkDescriptor;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::join_attempt::JoinPrimitive;
use crate::application::scan_networks::{PermissionStatus, ScanPrimitive};
use crate::application::HostError;

/// Buffered notifications per subscriber.
const SUBSCRIPTION_CAPACITY: usize = 8;

/// A network known to the mock host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedNetwork {
    /// Name reported in scan results.  May be empty to model a hidden network.
    pub name: String,
    /// The credential the network accepts.  `None` never accepts a join.
    pub credential: Option<String>,
}

/// A mock host that records all calls without touching a radio.
#[derive(Default)]
pub struct MockWirelessHost {
    /// Networks returned by scans, in scan order.
    pub networks: Mutex<Vec<SimulatedNetwork>>,
    /// Records each (network name, credential) pair passed to `join`.
    pub joins: Mutex<Vec<(String, String)>>,
    /// The raw (quoted) name reported by `active_network_name`.
    pub active_network: Mutex<Option<String>>,
    /// Number of `start_scan` calls that succeeded.
    pub scans_started: Mutex<usize>,
    /// When `true`, `permission_status` reports `Denied`.
    pub permission_denied: bool,
    /// When `true`, every `join` and `start_scan` returns `HostError::Platform`.
    pub should_fail: bool,
    subscribers: Mutex<Vec<mpsc::Sender<()>>>,
}

impl MockWirelessHost {
    /// Creates a host with no networks and permissions granted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a network that accepts `credential`.
    pub fn with_network(self, name: &str, credential: Option<&str>) -> Self {
        self.networks.lock().unwrap().push(SimulatedNetwork {
            name: name.to_string(),
            credential: credential.map(str::to_string),
        });
        self
    }

    /// Adds every network in `networks`.
    pub fn with_networks(self, networks: impl IntoIterator<Item = SimulatedNetwork>) -> Self {
        self.networks.lock().unwrap().extend(networks);
        self
    }

    /// Makes `permission_status` report `Denied`.
    pub fn denying_permission(mut self) -> Self {
        self.permission_denied = true;
        self
    }

    /// Makes every `join` and `start_scan` fail.
    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of join requests received so far.
    pub fn join_count(&self) -> usize {
        self.joins.lock().unwrap().len()
    }

    /// Number of subscribers whose receiver is still alive.
    pub fn active_subscriptions(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}

#[async_trait]
impl JoinPrimitive for MockWirelessHost {
    /// Records the request; connects when the credential matches.
    async fn join(&self, network: &NetworkDescriptor, credential: &str) -> Result<(), HostError> {
        self.joins
            .lock()
            .unwrap()
            .push((network.name.clone(), credential.to_string()));
        if self.should_fail {
            return Err(HostError::Platform("mock failure".into()));
        }

        let accepted = self
            .networks
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.name == network.name && n.credential.as_deref() == Some(credential));
        if accepted {
            debug!("mock host joined {}", network.name);
            *self.active_network.lock().unwrap() = Some(format!("\"{}\"", network.name));
        }
        Ok(())
    }

    async fn active_network_name(&self) -> Option<String> {
        self.active_network.lock().unwrap().clone()
    }
}

impl ScanPrimitive for MockWirelessHost {
    fn permission_status(&self) -> PermissionStatus {
        if self.permission_denied {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }

    /// Notifies every live subscriber immediately and drops closed ones.
    fn start_scan(&self) -> Result<(), HostError> {
        if self.should_fail {
            return Err(HostError::Platform("mock failure".into()));
        }
        *self.scans_started.lock().unwrap() += 1;

        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        for tx in subscribers.iter() {
            // A full buffer already holds an undelivered notification.
            let _ = tx.try_send(());
        }
        Ok(())
    }

    fn current_scan_results(&self) -> Vec<NetworkDescriptor> {
        self.networks
            .lock()
            .unwrap()
            .iter()
            .map(|n| NetworkDescriptor::new(n.name.clone()))
            .collect()
    }

    fn subscribe_scan_results(&self) -> mpsc::Receiver<()> {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_CAPACITY);
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
