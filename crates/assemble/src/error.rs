//! Assembly Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An assembly error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The redaction store could not be read or written.
    #[display("could not access redaction store at {}", _0.display())]
    Store(#[error(not(source))] PathBuf),
    /// No per-user data directory could be determined for the store.
    #[display("no data directory available for the redaction store")]
    DataDir,
    /// A registered diagram routine failed on its source text.
    #[display("diagram routine {name:?} failed")]
    Diagram {
        /// The routine name the page asked for.
        name: String,
    },
}
