//! The token-classifying scan that produces colored markup.

use crate::consts;
use crate::keywords::KeywordSet;
use crate::token::split_tokens;
use std::borrow::Cow;
use tracing::instrument;

/// Output capabilities of the page the colored markup is destined for.
///
/// Callers state what the target can render instead of the transform
/// sniffing a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderCapabilities {
    /// Escape `&` and `"` in addition to the angle brackets on raw input.
    pub escape_quotes: bool,
    /// Convert newlines, spaces and tabs in the output to explicit markup.
    pub explicit_whitespace: bool,
}

/// Whether the input text is raw source code or markup that has already
/// been escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Raw source text; angle brackets get escaped before scanning.
    Raw,
    /// Already-escaped markup; re-coloring it never double-escapes.
    Markup,
}

/// Wraps keywords, comments and string literals in classed spans.
///
/// A single left-to-right scan over word-boundary tokens, carrying four
/// boolean state flags. See [`colorize`](Self::colorize).
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    keywords: KeywordSet,
    capabilities: RenderCapabilities,
}
impl Colorizer {
    pub fn new(keywords: KeywordSet, capabilities: RenderCapabilities) -> Self {
        Self { keywords, capabilities }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Produce HTML-safe markup with keywords, line/block comments and
    /// string literals wrapped in classed spans.
    ///
    /// Classification precedence per token: subscript/superscript markers,
    /// block-comment start, line-comment start, line-comment end on a
    /// newline, keyword lookup (only outside comment/string state),
    /// block-comment end, quoted-string, bare-quote toggle, pass-through.
    ///
    /// An unterminated block comment leaves its span unclosed; downstream
    /// HTML tolerates it.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn colorize(&self, text: &str, kind: SourceKind) -> String {
        let escaped;
        let text = match kind {
            SourceKind::Raw => {
                escaped = self.escape(text);
                escaped.as_str()
            },
            SourceKind::Markup => text,
        };

        let tokens = split_tokens(text);
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        let mut inscript = false;
        let mut commenting = false;
        let mut linecommenting = false;
        let mut instring = false;
        for (index, raw) in tokens.iter().enumerate() {
            let mut token = Cow::Borrowed(*raw);
            if !inscript && token.contains('_') && tokens.get(index + 1).is_some_and(|next| next.contains('{')) {
                token = Cow::Owned(token.replacen('_', "<span class=\"subscript\">", 1));
                inscript = true;
            } else if !inscript && token.contains("^{") {
                token = Cow::Owned(token.replacen("^{", "<span class=\"superscript\">", 1));
                inscript = true;
            } else if inscript && token.contains('{') {
                token = Cow::Owned(token.replacen('{', "", 1));
            } else if inscript && token.contains('}') {
                token = Cow::Owned(token.replacen('}', "</span>", 1));
                inscript = false;
            }
            if !commenting && !linecommenting && token.contains("/*") {
                out.push_str(&token.replacen("/*", "<span-class=\"comment\">/*", 1));
                commenting = true;
            } else if !commenting && !linecommenting && token.contains("//") {
                out.push_str(&token.replacen("//", "<span-class=\"comment\">//", 1));
                linecommenting = true;
            } else if linecommenting && token.contains('\n') {
                close_line_comment(&token, &mut out);
                linecommenting = false;
            } else if !commenting && !instring && !linecommenting && self.keywords.contains(&token) {
                out.push_str("<span-class=\"keyword\">");
                out.push_str(&token);
                out.push_str("</span>");
            } else if consts::COMMENT_BRIDGE.is_match(&token) {
                // A `*/ ... /*` pair within one token; commenting unchanged.
                out.push_str(&token);
            } else if token.contains("*/") {
                out.push_str(&token.replacen("*/", "*/</span>", 1));
                commenting = false;
            } else if consts::CLOSED_STRING.is_match(&token) {
                out.push_str(&token);
            } else if token.contains('"') {
                instring = !instring;
                out.push_str(&token);
            } else {
                out.push_str(&token);
            }
        }

        let mut out = consts::CODE_MARKER.replace_all(&out, "<span class=\"varname\">$1</span>").into_owned();
        if self.capabilities.explicit_whitespace {
            out = explicit_whitespace(&out);
        }
        // Placeholder survives the whitespace pass; expanded last.
        out.replace("span-class", "span class")
    }

    fn escape(&self, text: &str) -> String {
        let mut text = Cow::Borrowed(text);
        if self.capabilities.escape_quotes {
            text = Cow::Owned(text.replace('&', "&amp;").replace('"', "&quot;"));
        }
        text.replace('>', "&gt;").replace('<', "&lt;")
    }
}

/// Close the open line-comment span ahead of the first newline, keeping a
/// preceding carriage return outside the span.
fn close_line_comment(token: &str, out: &mut String) {
    match token.find('\n') {
        Some(position) => {
            let (before, rest) = token.split_at(position);
            match before.strip_suffix('\r') {
                Some(before) => {
                    out.push_str(before);
                    out.push_str("</span>\r");
                },
                None => {
                    out.push_str(before);
                    out.push_str("</span>");
                },
            }
            out.push_str(rest);
        },
        None => out.push_str(token),
    }
}

fn explicit_whitespace(text: &str) -> String {
    text.replace("\r\n", "<br />")
        .replace('\n', "<br />")
        .replace(' ', "&nbsp;")
        .replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;")
}
