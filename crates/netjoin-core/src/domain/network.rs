//! Network identity and per-trial outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A wireless network returned by one scan cycle.
///
/// The descriptor is treated as opaque: it is handed unmodified from the scan
/// coordinator to the join controller, which only ever compares its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// The network name (SSID) as reported by the host scan.
    pub name: String,
}

impl NetworkDescriptor {
    /// Creates a descriptor for the network called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns `true` when the host has no usable name for this network.
    ///
    /// Hidden networks are reported with an empty name and cannot be selected.
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns `true` if `reported` names this network.
    ///
    /// Some hosts report the active network wrapped in double quotes
    /// (`"\"Home\""`).  Exactly one surrounding pair is stripped before the
    /// case-sensitive comparison.
    pub fn matches_reported_name(&self, reported: &str) -> bool {
        let unquoted = reported
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(reported);
        !self.is_unnamed() && unquoted == self.name
    }
}

impl fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Result of a single join attempt, produced once the verification delay has
/// elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The host reports the target network as the active connection.
    Success,
    /// The host is connected elsewhere, or not connected at all.
    Failure,
}

impl TrialOutcome {
    /// Derives the outcome from the host's reported active network name.
    pub fn from_active_network(target: &NetworkDescriptor, active: Option<&str>) -> Self {
        match active {
            Some(name) if target.matches_reported_name(name) => TrialOutcome::Success,
            _ => TrialOutcome::Failure,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
