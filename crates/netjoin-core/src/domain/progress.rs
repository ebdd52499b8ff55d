//! Progress figures reported after each candidate is issued.

use std::fmt;

use serde::Serialize;

/// Where the current attempt sits within its round and within the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialProgress {
    /// The round (file number) the candidate was taken from.
    pub round: u32,
    /// 1-based position of the candidate within its round.
    pub attempt_in_round: usize,
    /// Number of candidates in the round.
    pub round_size: usize,
    /// Attempts issued so far in the current run, across all rounds.
    pub total_attempts: usize,
}

impl TrialProgress {
    /// Percentage of the round tried so far, rounded to two decimal places.
    ///
    /// An empty round reports `0.0`.
    pub fn percentage(&self) -> f64 {
        if self.round_size == 0 {
            return 0.0;
        }
        let raw = 100.0 * self.attempt_in_round as f64 / self.round_size as f64;
        (raw * 100.0).round() / 100.0
    }
}

impl fmt::Display for TrialProgress {
    /// Renders as `"<i> / <n> (<pct>%)"`, e.g. `"1 / 3 (33.33%)"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.2}%)",
            self.attempt_in_round,
            self.round_size,
            self.percentage()
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
