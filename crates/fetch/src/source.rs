use crate::error::{ErrorKind, Result};
use crate::resolve::resolve;
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// Retrieval of text content by URL.
///
/// Success hands back the response body; failure carries a message the
/// caller surfaces directly into page content. Implementations do not
/// retry, time out specially, or cancel.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the body at `url` as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Submit a flat key/value mapping as a multipart form and return the
    /// response body.
    async fn post_form(&self, url: &str, params: &[(String, String)]) -> Result<String>;
}

/// HTTP-backed [`ContentSource`].
///
/// Carries an optional page location used to resolve scheme-less URLs
/// before the request goes out, and an optional MIME override sent as the
/// `Accept` header.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::Client,
    location: Option<String>,
    mime_override: Option<String>,
}
impl HttpSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve scheme-less URLs against this page location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Ask the server for this MIME type (`Accept` header).
    #[must_use]
    pub fn with_mime_override(mut self, mime: impl Into<String>) -> Self {
        self.mime_override = Some(mime.into());
        self
    }

    fn target(&self, url: &str) -> String {
        match &self.location {
            Some(location) => resolve(url, location),
            None => url.to_string(),
        }
    }

    async fn text(response: reqwest::Response, url: String) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status { url, status: status.as_u16() });
        }
        response.text().await.or_raise(|| ErrorKind::Transport(url))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = self.target(url);
        let mut request = self.client.get(&url);
        if let Some(mime) = &self.mime_override {
            request = request.header(reqwest::header::ACCEPT, mime);
        }
        let response = request.send().await.or_raise(|| ErrorKind::Transport(url.clone()))?;
        Self::text(response, url).await
    }

    #[instrument(skip(self, params), fields(fields = params.len()))]
    async fn post_form(&self, url: &str, params: &[(String, String)]) -> Result<String> {
        let url = self.target(url);
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in params {
            form = form.text(name.clone(), value.clone());
        }
        let mut request = self.client.post(&url).multipart(form);
        if let Some(mime) = &self.mime_override {
            request = request.header(reqwest::header::ACCEPT, mime);
        }
        let response = request.send().await.or_raise(|| ErrorKind::Transport(url.clone()))?;
        Self::text(response, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_resolves_relative_urls() {
        let source = HttpSource::new().with_location("https://site.edu/course/index.html");
        assert_eq!(source.target("notes.css"), "https://site.edu/course/notes.css");
        assert_eq!(source.target("https://other.org/x"), "https://other.org/x");
    }

    #[test]
    fn test_target_without_location_passes_through() {
        let source = HttpSource::new();
        assert_eq!(source.target("lectures/intro/index.html"), "lectures/intro/index.html");
    }

    #[test]
    fn test_status_error_message_names_url() {
        let err = ErrorKind::Status { url: "https://site.edu/x".to_string(), status: 404 };
        assert_eq!(err.to_string(), "could not read from https://site.edu/x: error 404");
    }
}
