//! Colorizer Error Types

use derive_more::{Display, Error};

/// A coloring/redaction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for coloring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A region tag was empty or otherwise unusable.
    #[display("invalid region tag: {_0:?}")]
    InvalidTag(#[error(not(source))] String),
    /// The region patterns for a tag could not be compiled.
    #[display("failed to build region pattern for tag {_0:?}")]
    Pattern(#[error(not(source))] String),
}
