//! Word-boundary tokenization for the colorizer scan.

/// A token boundary falls wherever word-ness changes, the way a regex `\b`
/// splits, plus a forced break after every newline so that line-comment
/// terminators always end their token.
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (index, c) in text.char_indices() {
        if let Some(p) = prev
            && (is_word(p) != is_word(c) || p == '\n')
        {
            tokens.push(&text[start..index]);
            start = index;
        }
        prev = Some(c);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}
