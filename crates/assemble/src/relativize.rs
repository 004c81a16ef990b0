//! Rewriting URLs found in injected content.
//!
//! Fragments are authored relative to their own lecture directory but get
//! spliced into the shell page, so embedded URLs must be re-based before
//! they resolve correctly.

use lectern_fetch::basename;

fn has_web_scheme(url: &str) -> bool {
    url.starts_with("http:/") || url.starts_with("https:/")
}

/// Rewrite `url` so it resolves relative to the lecture's directory
/// (`lecture_base`) instead of the shell page's (`base`).
///
/// A URL starting with `base` has that prefix replaced by `lecture_base`
/// exactly once. Otherwise both bases lose their last path segment in
/// lockstep and the match is retried; bases carrying an `http(s)` scheme
/// are never shortened. When no shortening is left, a URL under the site
/// base's parent directory is re-rooted under the remaining base, and
/// anything else (absolute-external, already correct) returns unchanged.
/// The empty URL returns unchanged immediately.
pub fn relativize(url: &str, lecture_base: &str, base: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let parent = basename(base);
    let mut base = base;
    let mut lecture_base = lecture_base;
    loop {
        if let Some(rest) = url.strip_prefix(base) {
            let rewritten = format!("{lecture_base}{rest}");
            tracing::trace!(url, %rewritten, "relativized by prefix");
            return rewritten;
        }
        let shortenable = base.contains('/') && !has_web_scheme(base);
        if !shortenable {
            if let Some(rest) = url.strip_prefix(parent) {
                tracing::trace!(url, "re-rooted under site base");
                return format!("{base}{rest}");
            }
            tracing::trace!(url, "left unchanged");
            return url.to_string();
        }
        match (base.rfind('/'), lecture_base.rfind('/')) {
            (Some(b), Some(l)) => {
                base = &base[..b];
                lecture_base = &lecture_base[..l];
            },
            _ => return url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "https://site.edu/course";
    const LECTURE: &str = "https://site.edu/course/lectures/intro";

    #[test]
    fn test_prefix_replaced_exactly_once() {
        let out = relativize("https://site.edu/course/images/fig.png", LECTURE, BASE);
        assert_eq!(out, "https://site.edu/course/lectures/intro/images/fig.png");
    }

    #[test]
    fn test_empty_url_unchanged() {
        assert_eq!(relativize("", LECTURE, BASE), "");
    }

    #[test]
    fn test_external_url_unchanged() {
        let url = "https://cdn.example.org/lib.js";
        assert_eq!(relativize(url, LECTURE, BASE), url);
    }

    #[test]
    fn test_site_parent_url_rerooted_under_base() {
        let out = relativize("https://site.edu/other/x.png", LECTURE, BASE);
        assert_eq!(out, "https://site.edu/course/other/x.png");
    }

    #[test]
    fn test_lockstep_shortening_for_schemeless_bases() {
        // Neither base carries a scheme, so both shorten until the prefix
        // matches one level up.
        let out = relativize("notes/shared/fig.png", "lectures/intro", "notes/site");
        assert_eq!(out, "lectures/shared/fig.png");
    }

    #[rstest]
    #[case("mailto:someone@site.edu")]
    #[case("#anchor")]
    #[case("relative/path.html")]
    fn test_unmatched_urls_unchanged(#[case] url: &str) {
        assert_eq!(relativize(url, LECTURE, BASE), url);
    }

    #[test]
    fn test_prefix_match_consumes_whole_base() {
        // The lecture directory itself maps onto the lecture base.
        let out = relativize(BASE, LECTURE, BASE);
        assert_eq!(out, LECTURE);
    }
}
