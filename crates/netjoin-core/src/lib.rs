//! # netjoin-core
//!
//! Shared library for netjoin containing the domain types, the credential
//! round loaders, and the trial sequencer.
//!
//! This crate has no async code and no dependencies on host radio APIs.  The
//! only I/O it performs is reading credential round files from a directory.
//!
//! # Architecture overview (for beginners)
//!
//! netjoin joins a selected wireless network by trying candidate credentials
//! one at a time.  Candidates live in numbered *round* files (`1.txt`,
//! `2.txt`, ...), one candidate per line.  The crate is split into:
//!
//! - **`domain`** – Plain value types: the network being joined, the outcome
//!   of one trial, and the progress figures shown to the user.
//!
//! - **`credentials`** – Where candidates come from.  A [`CredentialSource`]
//!   turns a round number into an ordered [`CandidateList`]; a missing or
//!   unreadable round simply yields an empty list.
//!
//! - **`sequencer`** – The [`TrialSequencer`] state machine that decides which
//!   candidate is next, rolls over to the next round, and detects when every
//!   round has been used up.

pub mod credentials;
pub mod domain;
pub mod sequencer;

// Re-export the most-used types at the crate root so callers can write
// `netjoin_core::TrialSequencer` instead of `netjoin_core::sequencer::TrialSequencer`.
pub use credentials::{
    round_file_name, CandidateList, CredentialError, CredentialSource,
    DirectoryCredentialSource, InMemoryCredentialSource,
};
pub use domain::network::{NetworkDescriptor, TrialOutcome};
pub use domain::progress::TrialProgress;
pub use sequencer::{
    Candidate, NextCandidate, SequencerState, TrialSequencer, DEFAULT_GAP_TOLERANCE, FIRST_ROUND,
};
