//! In-memory credential rounds for tests and simulations.

use std::collections::BTreeMap;

use super::{CandidateList, CredentialSource};

/// A credential source whose rounds are supplied at construction time.
///
/// # Example
///
/// ```rust
/// use netjoin_core::{CredentialSource, InMemoryCredentialSource};
///
/// let source = InMemoryCredentialSource::new()
///     .with_round(1, ["aaa", "bbb"])
///     .with_round(2, ["ccc"]);
/// assert_eq!(source.load(1).len(), 2);
/// assert!(source.load(3).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialSource {
    rounds: BTreeMap<u32, CandidateList>,
}

impl InMemoryCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) round `round`.
    pub fn with_round<'a>(mut self, round: u32, candidates: impl IntoIterator<Item = &'a str>) -> Self {
        self.rounds.insert(round, candidates.into_iter().collect());
        self
    }
}

impl CredentialSource for InMemoryCredentialSource {
    fn load(&self, round: u32) -> CandidateList {
        self.rounds.get(&round).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_round_loads_empty() {
        let source = InMemoryCredentialSource::new().with_round(1, ["x"]);
        assert!(source.load(2).is_empty());
        assert!(source.load(0).is_empty());
    }

    #[test]
    fn test_with_round_replaces_existing_round() {
        let source = InMemoryCredentialSource::new()
            .with_round(1, ["old"])
            .with_round(1, ["new"]);
        assert_eq!(source.load(1).get(0), Some("new"));
    }
}
