//! Marker-driven trimming of fetched source files.
//!
//! Source files carry comment markers deciding what the notes show:
//! `/* Rest not in notes */`, `/* Above not in notes */`, a paired
//! `/* Begin ... in notes */ ... /* End ... */` elision, and tag-scoped
//! `(* Begin TAG *) ... (* End TAG *)` regions.

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use tracing::instrument;

/// Trim the parts of `source` its redaction markers exclude from the notes.
///
/// Everything from a `Rest not in notes` marker onward is dropped,
/// everything up to and through an `Above not in notes` marker is dropped,
/// and a bracketed `Begin ... in notes`/`End ...` region collapses to an
/// ellipsis.
pub fn redact(source: &str) -> String {
    let source = consts::REST_NOT_IN_NOTES.replace(source, "");
    let source = consts::ABOVE_NOT_IN_NOTES.replace(&source, "");
    consts::ELIDED_REGION.replace(&source, "...").into_owned()
}

/// Keep only the text between `(* Begin TAG *)` and `(* End TAG *)`.
///
/// Two substitutions: drop everything up to and including the begin
/// marker's line, then drop everything from the end marker onward. Markers
/// on the final line (no trailing newline) are still honored.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidTag`] for an empty tag.
#[instrument(skip(source), fields(len = source.len()))]
pub fn extract_region(source: &str, tag: &str) -> Result<String> {
    if tag.trim().is_empty() {
        exn::bail!(ErrorKind::InvalidTag(tag.to_string()));
    }
    let escaped = regex::escape(tag);
    let begin_line = Regex::new(&format!(r"(?s).*\(\* Begin {escaped} \*\)[^\n]*\n"))
        .or_raise(|| ErrorKind::Pattern(tag.to_string()))?;
    let begin_bare = Regex::new(&format!(r"(?s).*\(\* Begin {escaped} \*\)"))
        .or_raise(|| ErrorKind::Pattern(tag.to_string()))?;
    let end = Regex::new(&format!(r"(?s)\(\* End {escaped} \*\).*"))
        .or_raise(|| ErrorKind::Pattern(tag.to_string()))?;

    let source = if begin_line.is_match(source) {
        begin_line.replace(source, "")
    } else {
        begin_bare.replace(source, "")
    };
    Ok(end.replace(&source, "").into_owned())
}
