//! NetworkScanCoordinator: discovers networks and hands the user's pick on.
//!
//! # How scanning works (for beginners)
//!
//! Scanning is asynchronous on every host.  `start_scan` only *requests* a
//! scan; some time later the host broadcasts a "scan results available"
//! notification carrying no payload, and the app re-queries the current
//! results.  The coordinator therefore:
//!
//! 1. Checks that the host allows scanning at all (location / Wi-Fi
//!    permissions).  A denial is surfaced once and not retried.
//! 2. Subscribes to the results notification (once per coordinator).
//! 3. Triggers the scan.
//! 4. On each notification, replaces its network list with the host's current
//!    results, dropping entries without a name.
//!
//! The subscription is released by [`NetworkScanCoordinator::stop`] or when
//! the coordinator is dropped, so the host never notifies a discarded
//! coordinator.

use std::sync::Arc;

use netjoin_core::NetworkDescriptor;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::HostError;

/// Whether the host lets this app scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Error type for scan operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The host declined the permissions scanning requires.
    #[error("scanning permission denied")]
    PermissionDenied,
    /// The host failed to start the scan.
    #[error(transparent)]
    Host(#[from] HostError),
    /// Results were awaited without a live subscription.
    #[error("scan not started")]
    NotStarted,
}

/// Host operations needed to discover networks.
#[cfg_attr(test, mockall::automock)]
pub trait ScanPrimitive: Send + Sync {
    /// Current permission state for scanning.
    fn permission_status(&self) -> PermissionStatus;

    /// Requests a scan.  Completion is signalled through the subscription.
    fn start_scan(&self) -> Result<(), HostError>;

    /// The host's most recent scan results.
    fn current_scan_results(&self) -> Vec<NetworkDescriptor>;

    /// Registers for "scan results available" notifications.
    ///
    /// The subscription ends when the receiver is dropped.
    fn subscribe_scan_results(&self) -> mpsc::Receiver<()>;
}

/// The scan use case.
pub struct NetworkScanCoordinator {
    scanner: Arc<dyn ScanPrimitive>,
    subscription: Option<mpsc::Receiver<()>>,
    networks: Vec<NetworkDescriptor>,
}

impl NetworkScanCoordinator {
    pub fn new(scanner: Arc<dyn ScanPrimitive>) -> Self {
        Self {
            scanner,
            subscription: None,
            networks: Vec::new(),
        }
    }

    /// Checks permissions, subscribes to results, and triggers a scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::PermissionDenied`] if the host disallows scanning,
    /// or [`ScanError::Host`] if the scan request itself fails.
    pub fn start_scan(&mut self) -> Result<(), ScanError> {
        if self.scanner.permission_status() == PermissionStatus::Denied {
            warn!("scan permission denied by host");
            return Err(ScanError::PermissionDenied);
        }

        if self.subscription.is_none() {
            self.subscription = Some(self.scanner.subscribe_scan_results());
            debug!("subscribed to scan results");
        }

        self.scanner.start_scan()?;
        info!("scan requested");
        Ok(())
    }

    /// Waits for the next results notification and refreshes the list.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotStarted`] if there is no subscription, or if the
    /// host closed it.
    pub async fn wait_for_results(&mut self) -> Result<&[NetworkDescriptor], ScanError> {
        let rx = self.subscription.as_mut().ok_or(ScanError::NotStarted)?;
        if rx.recv().await.is_none() {
            self.subscription = None;
            return Err(ScanError::NotStarted);
        }

        let results = self.scanner.current_scan_results();
        self.on_results(results);
        Ok(&self.networks)
    }

    /// Replaces the displayed networks with `descriptors`, minus unnamed ones.
    pub fn on_results(&mut self, descriptors: Vec<NetworkDescriptor>) {
        let total = descriptors.len();
        self.networks = descriptors.into_iter().filter(|d| !d.is_unnamed()).collect();
        debug!("scan results: {} of {total} networks named", self.networks.len());
    }

    /// The networks currently on display.
    pub fn networks(&self) -> &[NetworkDescriptor] {
        &self.networks
    }

    /// Returns the displayed network called `name`, unmodified.
    pub fn select(&self, name: &str) -> Option<NetworkDescriptor> {
        self.networks.iter().find(|d| d.name == name).cloned()
    }

    /// Returns `true` while subscribed to results notifications.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Releases the results subscription.
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            debug!("scan results subscription released");
        }
    }
}

impl Drop for NetworkScanCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
