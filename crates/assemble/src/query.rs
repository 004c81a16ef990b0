//! The shell page's query-parameter contract.

use crate::consts;

/// Parameters parsed from the shell page's query string.
///
/// `id=<lecture>` selects the lecture fragment to load; an absent or
/// malformed id leaves the loader idle. `redactions=<ids>` carries a
/// newline-separated identifier list to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub lecture: Option<String>,
    pub redactions: Option<String>,
}
impl PageQuery {
    /// Parse a raw query string, with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for pair in query.split('&') {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            match name {
                "id" => {
                    let value = decode(value);
                    if consts::LECTURE_ID.is_match(&value) {
                        parsed.lecture = Some(value);
                    }
                },
                "redactions" => parsed.redactions = Some(decode(value)),
                _ => {},
            }
        }
        parsed
    }

    /// Idle: nothing to load and nothing to persist.
    pub fn is_empty(&self) -> bool {
        self.lecture.is_none() && self.redactions.is_none()
    }
}

fn decode(value: &str) -> String {
    let value = value.replace('+', " ");
    match urlencoding::decode(&value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parses_lecture_id() {
        let query = PageQuery::parse("?id=java_rep");
        assert_eq!(query.lecture.as_deref(), Some("java_rep"));
        assert_eq!(query.redactions, None);
    }

    #[rstest]
    #[case("")]
    #[case("?")]
    #[case("?id=")]
    #[case("?id=Intro")]
    #[case("?id=intro!")]
    #[case("?other=x")]
    fn test_invalid_or_absent_id_is_idle(#[case] raw: &str) {
        assert_eq!(PageQuery::parse(raw).lecture, None);
    }

    #[test]
    fn test_parses_redaction_list() {
        let query = PageQuery::parse("?redactions=sec_a%0Asec_b");
        assert_eq!(query.redactions.as_deref(), Some("sec_a\nsec_b"));
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let query = PageQuery::parse("?redactions=Loop+invariants");
        assert_eq!(query.redactions.as_deref(), Some("Loop invariants"));
    }

    #[test]
    fn test_both_parameters_together() {
        let query = PageQuery::parse("?id=intro&redactions=a");
        assert_eq!(query.lecture.as_deref(), Some("intro"));
        assert_eq!(query.redactions.as_deref(), Some("a"));
        assert!(!query.is_empty());
    }
}
