//! User-facing notifications.
//!
//! Trial events and scan errors are turned into short messages with a
//! severity level.  The binary drains them from the controller's event channel
//! and either logs them or prints them to stdout as one JSON object per line:
//!
//! ```json
//! {"level":"info","message":"Trying candidate 2 / 5 (40.00%)"}
//! {"level":"success","message":"Joined Lab"}
//! ```
//!
//! Notifications never carry candidate values.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::join_attempt::TrialEvent;
use crate::application::scan_networks::ScanError;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// The notification shown for a trial event.
    pub fn from_event(event: &TrialEvent) -> Self {
        match event {
            TrialEvent::Attempting { progress, .. } => Self::new(
                NotificationLevel::Info,
                format!("Trying candidate {progress}"),
            ),
            TrialEvent::Failed { network, .. } => {
                Self::new(NotificationLevel::Warning, format!("Could not join {network}"))
            }
            TrialEvent::Succeeded { network, .. } => {
                Self::new(NotificationLevel::Success, format!("Joined {network}"))
            }
            TrialEvent::Exhausted { network, .. } => Self::new(
                NotificationLevel::Error,
                format!("Candidate lists exhausted for {network}"),
            ),
            TrialEvent::Cancelled { network, attempts } => Self::new(
                NotificationLevel::Warning,
                format!("Stopped joining {network} after {attempts} attempts"),
            ),
        }
    }

    /// The notification shown when a scan cannot run.
    pub fn from_scan_error(err: &ScanError) -> Self {
        match err {
            ScanError::PermissionDenied => Self::new(
                NotificationLevel::Error,
                "Scanning requires location and Wi-Fi permissions",
            ),
            other => Self::new(NotificationLevel::Error, format!("Scan failed: {other}")),
        }
    }

    /// Encodes the notification as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; with the current field types this does
    /// not happen in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Emits the notification through `tracing` at a matching level.
    pub fn log(&self) {
        match self.level {
            NotificationLevel::Info | NotificationLevel::Success => info!("{}", self.message),
            NotificationLevel::Warning => warn!("{}", self.message),
            NotificationLevel::Error => error!("{}", self.message),
        }
    }
}

/// Drains `events` until every sender is dropped.
///
/// With `json` set, each notification is printed to stdout as a JSON line;
/// otherwise it is logged.
pub fn spawn_notification_pump(events: mpsc::Receiver<TrialEvent>, json: bool) -> JoinHandle<()> {
    spawn_notification_pump_to(events, json, std::io::stdout())
}

/// Like [`spawn_notification_pump`], but JSON lines go to `out`.
pub fn spawn_notification_pump_to<W>(
    mut events: mpsc::Receiver<TrialEvent>,
    json: bool,
    mut out: W,
) -> JoinHandle<()>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let notification = Notification::from_event(&event);
            if !json {
                notification.log();
                continue;
            }
            let written = notification
                .to_json()
                .map_err(std::io::Error::from)
                .and_then(|line| writeln!(out, "{line}"));
            if let Err(e) = written {
                warn!("failed to write notification: {e}");
            }
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
