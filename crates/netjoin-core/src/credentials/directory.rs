//! Credential rounds stored as `<round>.txt` files in a directory.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::{round_file_name, CandidateList, CredentialError, CredentialSource};

/// Reads round `N` from `<dir>/N.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryCredentialSource {
    dir: PathBuf,
}

impl DirectoryCredentialSource {
    /// Creates a source reading from `dir`.  The directory is not checked
    /// until a round is loaded.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the file holding round `round`.
    pub fn round_path(&self, round: u32) -> PathBuf {
        self.dir.join(round_file_name(round))
    }

    /// Loads round `round`, distinguishing "missing" from "unreadable".
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] when the file does not exist and
    /// [`CredentialError::Unreadable`] for every other I/O failure, including
    /// content that is not valid UTF-8.
    pub fn try_load(&self, round: u32) -> Result<CandidateList, CredentialError> {
        let path = self.round_path(round);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(CandidateList::from_lines(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CredentialError::NotFound { path })
            }
            Err(source) => Err(CredentialError::Unreadable { path, source }),
        }
    }
}

impl CredentialSource for DirectoryCredentialSource {
    fn load(&self, round: u32) -> CandidateList {
        match self.try_load(round) {
            Ok(list) => {
                debug!("loaded round {round}: {} candidates", list.len());
                list
            }
            Err(e @ CredentialError::NotFound { .. }) => {
                debug!("{e}");
                CandidateList::new()
            }
            Err(e) => {
                warn!("{e}; treating round {round} as empty");
                CandidateList::new()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
