//! Obfuscated email links.
//!
//! The username is stored rotated so address harvesters scraping the page
//! source never see it; the real mailto link is only built on demand.

use crate::node::{Element, tags};

const ROT_INPUT: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ROT_OUTPUT: &str = "NOPQRSTUVWXYZABCDEFGHIJKLMnopqrstuvwxyzabcdefghijklm5678901234";

/// Rotate letters by 13 and digits by 5. Self-inverse, so the same call
/// encodes and decodes.
pub fn rot13(text: &str) -> String {
    text.chars()
        .map(|c| match ROT_INPUT.find(c) {
            Some(index) => ROT_OUTPUT.as_bytes()[index] as char,
            None => c,
        })
        .collect()
}

/// An email address whose username is held in rotated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscatedEmail {
    user: String,
    domain: String,
    name: String,
    subject: Option<String>,
}
impl ObfuscatedEmail {
    /// `user` is the rotated username; `domain` and `name` are plain.
    pub fn new(user: impl Into<String>, domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self { user: user.into(), domain: domain.into(), name: name.into(), subject: None }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// The decoded username.
    pub fn username(&self) -> String {
        rot13(&self.user)
    }

    /// The decoded `user@domain` address.
    pub fn address(&self) -> String {
        format!("{}@{}", self.username(), self.domain)
    }

    /// The mailto URL the revealed link points at.
    pub fn mailto_url(&self) -> String {
        let mut url = format!("mailto:%20{}%20<{}>", self.name, self.address());
        if let Some(subject) = &self.subject {
            url.push_str(&format!("?Subject=[{subject}]%20"));
        }
        url
    }

    /// The placeholder shown before the address is revealed: a link whose
    /// contents invite the reader to hover.
    pub fn placeholder(&self, link_id: &str, cut_id: &str) -> Element {
        tags::a().id(link_id).attr("href", "default.html").class("email").child(
            tags::span().id(cut_id).child("Turn on JavaScript to view the email address"),
        )
    }

    /// The revealed link: address text, mailto target.
    pub fn revealed_link(&self) -> Element {
        tags::a().class("email").attr("href", self.mailto_url()).child(self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", "nop")]
    #[case("NOP", "ABC")]
    #[case("user2", "hfre7")]
    #[case("a.b-c", "n.o-p")]
    fn test_rot13(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rot13(input), expected);
    }

    #[test]
    fn test_rot13_is_self_inverse() {
        let original = "someone42";
        assert_eq!(rot13(&rot13(original)), original);
    }

    #[test]
    fn test_address_decodes_username() {
        let email = ObfuscatedEmail::new(rot13("teacher"), "cs.example.edu", "A Teacher");
        assert_eq!(email.address(), "teacher@cs.example.edu");
    }

    #[test]
    fn test_mailto_url_without_subject() {
        let email = ObfuscatedEmail::new(rot13("teacher"), "cs.example.edu", "A Teacher");
        assert_eq!(email.mailto_url(), "mailto:%20A Teacher%20<teacher@cs.example.edu>");
    }

    #[test]
    fn test_mailto_url_with_subject() {
        let email = ObfuscatedEmail::new(rot13("teacher"), "cs.example.edu", "A Teacher")
            .with_subject("Course");
        assert!(email.mailto_url().ends_with("?Subject=[Course]%20"));
    }

    #[test]
    fn test_revealed_link_markup() {
        let email = ObfuscatedEmail::new(rot13("t"), "example.edu", "T");
        let html = email.revealed_link().render();
        assert!(html.starts_with("<a class=\"email\" href=\"mailto:"));
        assert!(html.contains(">t@example.edu</a>"));
    }

    #[test]
    fn test_placeholder_markup() {
        let email = ObfuscatedEmail::new("x", "example.edu", "X");
        let html = email.placeholder("mailto", "cutme").render();
        assert!(html.contains("id=\"mailto\""));
        assert!(html.contains("id=\"cutme\""));
        assert!(html.contains("Turn on JavaScript"));
    }
}
