//! Domain layer: pure value types with no I/O.
//!
//! - **`network`** – [`NetworkDescriptor`](network::NetworkDescriptor), the
//!   identity of a discovered network, and
//!   [`TrialOutcome`](network::TrialOutcome), the result of one join attempt.
//! - **`progress`** – [`TrialProgress`](progress::TrialProgress), the
//!   "attempt i of n" figures reported after every candidate is issued.

pub mod network;
pub mod progress;
