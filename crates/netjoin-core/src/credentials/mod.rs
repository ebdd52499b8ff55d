//! Candidate credential rounds.
//!
//! # What is a round? (for beginners)
//!
//! Candidates are grouped into numbered rounds.  Round `N` is stored in a text
//! resource named `N.txt`, one candidate per line, and rounds are consumed in
//! increasing order starting at 1.  There is no index of how many rounds exist:
//! the sequencer just keeps asking for the next number until it gets nothing
//! back.
//!
//! # Failure is data
//!
//! A [`CredentialSource`] never fails.  A round that is missing, unreadable,
//! or empty comes back as an empty [`CandidateList`], which the sequencer
//! interprets as "no more candidates here".  Adapters that can tell the
//! difference (like [`DirectoryCredentialSource::try_load`]) expose it through
//! [`CredentialError`] for logging and tests.
//!
//! # Implementations
//!
//! | Type                         | Backing store                        |
//! |------------------------------|--------------------------------------|
//! | [`DirectoryCredentialSource`]| `<dir>/<round>.txt` files on disk    |
//! | [`InMemoryCredentialSource`] | a `BTreeMap` filled at construction  |

use std::path::PathBuf;

use thiserror::Error;

pub mod directory;
pub mod memory;

pub use directory::DirectoryCredentialSource;
pub use memory::InMemoryCredentialSource;

/// Error type for reading a credential round.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No resource exists for the requested round.
    #[error("credential round not found at {path}")]
    NotFound { path: PathBuf },

    /// The resource exists but could not be read (permissions, bad encoding).
    #[error("credential round at {path} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Produces the ordered candidate list for a round.
///
/// Implementations must be deterministic for a given round number while the
/// underlying store is unchanged.
pub trait CredentialSource: Send + Sync {
    /// Loads round `round`.
    ///
    /// Returns an empty list when the round does not exist or cannot be read.
    fn load(&self, round: u32) -> CandidateList;
}

/// Returns the resource name for round `round`, e.g. `"3.txt"`.
pub fn round_file_name(round: u32) -> String {
    format!("{round}.txt")
}

/// An ordered sequence of candidate credentials for one round.
///
/// Order is file order.  Entries are neither trimmed nor deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `text` into one candidate per line.
    ///
    /// Both `\n` and `\r\n` end a line.  A final line terminator does not
    /// produce a trailing empty candidate, but blank lines in the middle of
    /// the text are kept as empty candidates.
    pub fn from_lines(text: &str) -> Self {
        Self(text.lines().map(str::to_owned).collect())
    }

    /// Number of candidates in the round.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the round has no candidates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the candidate at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Iterates over the candidates in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for CandidateList {
    fn from(candidates: Vec<String>) -> Self {
        Self(candidates)
    }
}

impl<'a> FromIterator<&'a str> for CandidateList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
