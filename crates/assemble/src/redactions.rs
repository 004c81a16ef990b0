//! The persisted redaction list.
//!
//! The only value outliving a page load: a set of section/header
//! identifiers excluded from display, kept newline-separated in a small
//! file under the per-user data directory.

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::instrument;

const FILE_NAME: &str = "redactions";

/// File-backed store for the redaction identifier set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionStore {
    path: PathBuf,
}
impl RedactionStore {
    /// A store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user default location.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DataDir`] when no home directory is available.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "lectern").ok_or_raise(|| ErrorKind::DataDir)?;
        Ok(Self::at(dirs.data_dir().join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored set. A missing file is an empty set, not an error.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<HashSet<String>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(err) => {
                return Err(err).or_raise(|| ErrorKind::Store(self.path.clone()));
            },
        };
        Ok(parse(&data))
    }

    /// Persist a newline-separated identifier list verbatim.
    #[instrument(skip(self, list), fields(path = %self.path.display()))]
    pub fn save(&self, list: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Store(self.path.clone()))?;
        }
        std::fs::write(&self.path, list).or_raise(|| ErrorKind::Store(self.path.clone()))
    }

    /// Drop the stored list entirely. Clearing an absent store is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).or_raise(|| ErrorKind::Store(self.path.clone())),
        }
    }
}

/// Entries are separated by newlines, with incidental whitespace around
/// each entry ignored; blank lines carry nothing.
fn parse(data: &str) -> HashSet<String> {
    data.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}
