//! Fetch Error Types

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Both variants surface directly into page content as plain text; there is
/// no retry path.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered with a non-success status.
    #[display("could not read from {url}: error {status}")]
    Status {
        /// The resolved URL the request was issued against.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },
    /// The request never produced a response.
    #[display("could not read from {_0}: transport failure")]
    Transport(#[error(not(source))] String),
}
