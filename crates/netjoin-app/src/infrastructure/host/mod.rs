//! Host wireless adapters.
//!
//! Every adapter implements both [`JoinPrimitive`] and [`ScanPrimitive`].
//!
//! [`JoinPrimitive`]: crate::application::join_attempt::JoinPrimitive
//! [`ScanPrimitive`]: crate::application::scan_networks::ScanPrimitive

pub mod mock;
