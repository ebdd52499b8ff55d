//! netjoin-app library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does netjoin-app do? (for beginners)
//!
//! The app drives one complete session:
//!
//! 1. Asks the host to scan for wireless networks and waits for the host's
//!    "scan results available" notification.
//! 2. Presents the discovered networks (dropping unnamed ones) and lets the
//!    user pick one.
//! 3. Tries candidate credentials against the chosen network one at a time,
//!    waiting a short delay after each join request and then checking whether
//!    the host is now connected to that network.
//! 4. Reports progress after every attempt and stops on success, on
//!    exhaustion of every credential round, or on cancellation.
//!
//! All radio work is delegated to the host through the [`JoinPrimitive`] and
//! [`ScanPrimitive`] traits.
//!
//! [`JoinPrimitive`]: application::join_attempt::JoinPrimitive
//! [`ScanPrimitive`]: application::scan_networks::ScanPrimitive

/// Application layer: the scan and join use cases and the host traits.
pub mod application;

/// Infrastructure layer: host adapters, configuration, and notifications.
pub mod infrastructure;
