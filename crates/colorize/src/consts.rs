use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Redaction markers. The middle quantifiers are greedy, so paired markers
// collapse the widest bracketed region, as the site's source files expect.
regex!(REST_NOT_IN_NOTES, r"(?s)/\* Rest not in notes \*/.*");
regex!(ABOVE_NOT_IN_NOTES, r"(?s).*/\* Above not in notes \*/\r?\n?");
regex!(ELIDED_REGION, r"(?s)/\* Begin [^\n]{3} in notes \*/.*/\* End [^\n]{3} \*/");

// Inline-code marker rewritten after the token scan.
regex!(CODE_MARKER, r"\{@code ([^}]*)\}");

// Token shapes consulted during the scan.
regex!(COMMENT_BRIDGE, r"\*/\s+/\*");
regex!(CLOSED_STRING, r#""[^"]*""#);
