//! Source-code coloring for lecture notes.
//!
//! Scans code text for keyword/comment/string boundaries and wraps the
//! recognized tokens in classed `<span>` markup. Also provides the
//! redaction pre-processing applied to fetched source files before they
//! are spliced into a page.

mod consts;
pub mod error;
mod keywords;
mod redact;
mod scan;
mod token;

pub use crate::keywords::KeywordSet;
pub use crate::redact::{extract_region, redact};
pub use crate::scan::{Colorizer, RenderCapabilities, SourceKind};

/// Colorize `text` with the default keyword set and capabilities.
///
/// Convenience wrapper around [`Colorizer`]; construct one explicitly to
/// supply a custom [`KeywordSet`] or [`RenderCapabilities`].
pub fn colorize(text: &str, kind: SourceKind) -> String {
    Colorizer::default().colorize(text, kind)
}
