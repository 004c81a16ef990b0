//! Assembling a lecture page from its fetched fragment.
//!
//! The [`Loader`] fetches a lecture's `index.html` fragment and runs it
//! through one rewriting pass: redaction, URL relativization, code
//! coloring, math italics, answer scaffolding and diagram dispatch.

mod consts;
mod diagram;
pub mod error;
mod loader;
mod query;
mod redactions;
mod relativize;
mod rewrite;

pub use crate::diagram::{Diagram, DiagramRegistry};
pub use crate::loader::Loader;
pub use crate::query::PageQuery;
pub use crate::redactions::RedactionStore;
pub use crate::relativize::relativize;
