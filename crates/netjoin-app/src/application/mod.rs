//! Application layer use cases.
//!
//! # What use cases does the app have?
//!
//! - **`scan_networks`** – Triggers a host scan, waits for the asynchronous
//!   results notification, and keeps the filtered list of selectable
//!   networks.  The host scan is reached through the `ScanPrimitive` trait.
//!
//! - **`join_attempt`** – Runs the credential trial loop against one selected
//!   network.  The host join call and the connection-state query are reached
//!   through the `JoinPrimitive` trait, injected at construction time.
//!
//! Both traits report host failures as [`HostError`].

use thiserror::Error;

pub mod join_attempt;
pub mod scan_networks;

/// Error returned by a host primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host rejected or failed the request.
    #[error("host error: {0}")]
    Platform(String),
    /// The radio is switched off or unavailable.
    #[error("wireless radio unavailable")]
    RadioUnavailable,
}
