//! In-memory [`ContentSource`] for tests.

use crate::error::{ErrorKind, Result};
use crate::source::ContentSource;
use async_trait::async_trait;
use exn::OptionExt;
use std::collections::HashMap;

/// Serves canned bodies by exact URL; anything else is a 404.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    bodies: HashMap<String, String>,
}
impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.bodies.insert(url.into(), body.into());
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_raise(|| ErrorKind::Status { url: url.to_string(), status: 404 })
    }

    async fn post_form(&self, url: &str, _params: &[(String, String)]) -> Result<String> {
        self.fetch_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_inserted_body() {
        let source = MockSource::new().with("https://site.edu/a.txt", "hello");
        assert_eq!(source.fetch_text("https://site.edu/a.txt").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let source = MockSource::new();
        let err = source.fetch_text("https://site.edu/missing").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status { status: 404, .. }));
    }
}
