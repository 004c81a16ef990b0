//! Italicizing letter runs inside math-classed text.

use crate::node::{Node, tags};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LETTER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-zA-Z]+").unwrap());

/// Multi-letter operator names that stay upright.
const MATH_FUNCTIONS: &[&str] = &["log", "lim", "lg", "if", "iff", "max", "min", "frac", "mod", "ln"];

/// Rewrites math text so variables read italic while operator names like
/// `log` or `lim` stay upright.
#[derive(Debug, Clone)]
pub struct MathItalicizer {
    functions: HashSet<String>,
}
impl MathItalicizer {
    pub fn new(functions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { functions: functions.into_iter().map(Into::into).collect() }
    }

    /// A letter run that names a known operator keeps its upright form.
    pub fn is_function(&self, word: &str) -> bool {
        self.functions.contains(word)
    }

    /// Does this text contain anything worth italicizing?
    pub fn has_letters(text: &str) -> bool {
        text.chars().any(|c| c.is_ascii_alphabetic())
    }

    /// Wrap the letter runs of `text` in `<i>` elements, leaving operator
    /// names and everything between the runs as plain text, all inside a
    /// `span.math_ital` so the pass never reprocesses its own output.
    pub fn italicize_text(&self, text: &str) -> Node {
        let mut children = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let Some(found) = LETTER_RUN.find(rest) else {
                children.push(Node::text(rest));
                break;
            };
            if found.start() > 0 {
                children.push(Node::text(&rest[..found.start()]));
            }
            let word = found.as_str();
            if self.is_function(word) {
                children.push(Node::text(word));
            } else {
                children.push(tags::i().child(word).into());
            }
            rest = &rest[found.end()..];
        }
        tags::span().class("math_ital").children(children).into()
    }
}
impl Default for MathItalicizer {
    fn default() -> Self {
        Self::new(MATH_FUNCTIONS.iter().copied())
    }
}
