//! Infrastructure layer for the netjoin app.
//!
//! Contains host-facing adapters, the configuration file, and the user
//! notification pump.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `netjoin_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`host`** – Implementations of `JoinPrimitive` and `ScanPrimitive`.
//!   Only the in-memory `MockWirelessHost` ships; it backs the tests and the
//!   binary's simulation mode.
//!
//! - **`storage`** – TOML configuration: credential directory, timing, log
//!   level, and the simulated networks.
//!
//! - **`notifications`** – Turns trial events and scan errors into the short
//!   messages shown to the user, and pumps them to the log or to stdout as
//!   JSON lines.

pub mod host;
pub mod notifications;
pub mod storage;
