//! TrialSequencer: decides which candidate credential is tried next.
//!
//! # State machine (for beginners)
//!
//! The sequencer walks through every candidate of round 1, then every
//! candidate of round 2, and so on.  It has three effective states:
//!
//! ```text
//!              peek() finds index < len
//!   Loaded  ◄──────────────────────────────┐
//!     │                                    │
//!     │ advance() moves index to len       │ load of next round
//!     ▼                                    │ returned candidates
//!   RoundExhausted ────── peek() ──────────┤
//!                                          │ gap_tolerance + 1 loads
//!                                          ▼ in a row returned nothing
//!                                   GloballyExhausted ── reset() ──► initial
//! ```
//!
//! # Peek and advance are separate
//!
//! [`TrialSequencer::peek`] returns the current candidate without consuming
//! it.  The candidate is only consumed by [`TrialSequencer::advance`] (or its
//! alias [`TrialSequencer::on_failure`]) once the caller has verified that the
//! attempt failed.  A successful candidate is therefore never skipped, and an
//! interrupted run resumes on the candidate it was interrupted at.
//!
//! # Exhaustion does not reset
//!
//! Global exhaustion is sticky: [`TrialSequencer::is_exhausted`] stays `true`
//! and `peek()` keeps returning [`NextCandidate::Exhausted`] until the owner
//! calls [`TrialSequencer::reset`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::credentials::{CandidateList, CredentialSource};

/// Number of the first round loaded after construction or reset.
pub const FIRST_ROUND: u32 = 1;

/// Default number of consecutive empty rounds skipped before the sequencer
/// declares global exhaustion.
pub const DEFAULT_GAP_TOLERANCE: u32 = 1;

/// Mutable sequencing state.
///
/// Invariant: `within_round_index <= candidates.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerState {
    /// The round to load once `candidates` is used up.
    pub round_index: u32,
    /// Index of the next untried candidate within `candidates`.
    pub within_round_index: usize,
    /// The currently loaded round.
    pub candidates: CandidateList,
    /// Number of the round `candidates` came from, `None` before the first load.
    pub current_round: Option<u32>,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            round_index: FIRST_ROUND,
            within_round_index: 0,
            candidates: CandidateList::new(),
            current_round: None,
        }
    }
}

/// A candidate credential together with its position in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The credential text, exactly as it appeared on its line.
    pub value: String,
    /// The round it was taken from.
    pub round: u32,
    /// 1-based position within the round.
    pub position: usize,
    /// Number of candidates in the round.
    pub round_size: usize,
}

/// Result of [`TrialSequencer::peek`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextCandidate {
    Candidate(Candidate),
    Exhausted,
}

/// Sequential credential trial state machine.
pub struct TrialSequencer {
    source: Arc<dyn CredentialSource>,
    state: SequencerState,
    gap_tolerance: u32,
    exhausted: bool,
}

impl TrialSequencer {
    /// Creates a sequencer in the initial state, reading rounds from `source`.
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            source,
            state: SequencerState::default(),
            gap_tolerance: DEFAULT_GAP_TOLERANCE,
            exhausted: false,
        }
    }

    /// Sets how many consecutive empty rounds are skipped before the run is
    /// declared exhausted.  `0` makes the first empty round terminal.
    pub fn with_gap_tolerance(mut self, gap_tolerance: u32) -> Self {
        self.gap_tolerance = gap_tolerance;
        self
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    /// Returns `true` once no further round yields candidates.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the candidate that should be tried next, without consuming it.
    ///
    /// Loads the next round(s) when the current one is used up.  Calling
    /// `peek` repeatedly without `advance` returns the same candidate.
    pub fn peek(&mut self) -> NextCandidate {
        if self.exhausted {
            return NextCandidate::Exhausted;
        }
        if self.state.within_round_index >= self.state.candidates.len() && !self.load_next_round() {
            return NextCandidate::Exhausted;
        }

        let index = self.state.within_round_index;
        match (self.state.candidates.get(index), self.state.current_round) {
            (Some(value), Some(round)) => NextCandidate::Candidate(Candidate {
                value: value.to_owned(),
                round,
                position: index + 1,
                round_size: self.state.candidates.len(),
            }),
            // load_next_round only returns true with a non-empty list and a
            // current round, so this arm is unreachable in practice.
            _ => NextCandidate::Exhausted,
        }
    }

    /// Consumes the current candidate.
    ///
    /// Does nothing if the current round is already used up; the next `peek`
    /// takes care of rolling over.
    pub fn advance(&mut self) {
        if self.state.within_round_index < self.state.candidates.len() {
            self.state.within_round_index += 1;
        }
    }

    /// Peeks and immediately consumes, returning `None` on exhaustion.
    ///
    /// Convenience for callers that do not verify each attempt.
    // Not an `Iterator`: exhaustion is sticky until `reset`, which a fused
    // iterator contract cannot express.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Candidate> {
        match self.peek() {
            NextCandidate::Candidate(candidate) => {
                self.advance();
                Some(candidate)
            }
            NextCandidate::Exhausted => None,
        }
    }

    /// Records a verified failed attempt with the current candidate.
    pub fn on_failure(&mut self) {
        self.advance();
    }

    /// Records a verified successful attempt.  The state is left untouched so
    /// the winning candidate is still the current one.
    pub fn on_success(&mut self) {
        debug!(
            "candidate {} of round {:?} succeeded",
            self.state.within_round_index + 1,
            self.state.current_round
        );
    }

    /// Returns to the initial state: round 1, nothing loaded, not exhausted.
    ///
    /// Calling it more than once has no further effect.
    pub fn reset(&mut self) {
        self.state = SequencerState::default();
        self.exhausted = false;
    }

    /// Loads rounds starting at `round_index` until one has candidates.
    ///
    /// Returns `false` (and marks the sequencer exhausted) after
    /// `gap_tolerance + 1` consecutive empty rounds.
    fn load_next_round(&mut self) -> bool {
        let mut empty_loads = 0u32;
        loop {
            let round = self.state.round_index;
            let candidates = self.source.load(round);
            self.state.round_index = round.saturating_add(1);
            self.state.within_round_index = 0;

            if !candidates.is_empty() {
                debug!("round {round} loaded with {} candidates", candidates.len());
                self.state.candidates = candidates;
                self.state.current_round = Some(round);
                return true;
            }

            debug!("round {round} has no candidates");
            empty_loads += 1;
            if empty_loads > self.gap_tolerance || round == u32::MAX {
                info!("no candidates left after round {round}");
                self.state.candidates = CandidateList::new();
                self.state.current_round = None;
                self.exhausted = true;
                return false;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
