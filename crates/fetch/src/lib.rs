//! Fetching text and HTML fragments over HTTP.
//!
//! The [`ContentSource`] trait abstracts retrieval so page assembly can be
//! tested without a network; [`HttpSource`] is the real implementation.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod resolve;
mod source;

#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockSource;
pub use crate::resolve::{basename, resolve};
pub use crate::source::{ContentSource, HttpSource};
