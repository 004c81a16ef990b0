//! The composition point: fetch a lecture fragment and localize it.

use crate::diagram::DiagramRegistry;
use crate::query::PageQuery;
use crate::relativize::relativize;
use crate::rewrite::{FetchedCode, LoadTarget, RewriteSetup, Rewriter};
use lectern_colorize::{Colorizer, SourceKind, extract_region, redact};
use lectern_fetch::{ContentSource, basename};
use lectern_markup::MathItalicizer;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Loads one lecture per call: fetch the fragment, pre-fetch its code
/// blocks, run the rewriting pass, hand back the assembled body HTML.
///
/// Page loads are independent; the loader holds no state across them
/// beyond its configuration.
pub struct Loader<S> {
    source: S,
    base_url: String,
    colorizer: Colorizer,
    italicizer: MathItalicizer,
    diagrams: DiagramRegistry,
    redactions: HashSet<String>,
}
impl<S: ContentSource> Loader<S> {
    pub fn new(source: S, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            colorizer: Colorizer::default(),
            italicizer: MathItalicizer::default(),
            diagrams: DiagramRegistry::new(),
            redactions: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_colorizer(mut self, colorizer: Colorizer) -> Self {
        self.colorizer = colorizer;
        self
    }

    #[must_use]
    pub fn with_italicizer(mut self, italicizer: MathItalicizer) -> Self {
        self.italicizer = italicizer;
        self
    }

    #[must_use]
    pub fn with_diagrams(mut self, diagrams: DiagramRegistry) -> Self {
        self.diagrams = diagrams;
        self
    }

    #[must_use]
    pub fn with_redactions(mut self, redactions: HashSet<String>) -> Self {
        self.redactions = redactions;
        self
    }

    /// Act on a page query: load the lecture it names, or `None` when the
    /// query selects nothing (the idle state).
    pub async fn load(&self, query: &PageQuery) -> Option<String> {
        let id = query.lecture.as_deref()?;
        Some(self.load_lecture(id).await)
    }

    /// Load and localize one lecture's fragment.
    ///
    /// A fragment fetch failure degrades to the error message as the body;
    /// there is no retry and no failure escalation.
    #[instrument(skip(self))]
    pub async fn load_lecture(&self, id: &str) -> String {
        let url = format!("{}/lectures/{id}/index.html", self.base_url);
        match self.source.fetch_text(&url).await {
            Ok(body) => self.localize(&body, &url).await,
            Err(error) => {
                let error = &*error;
                tracing::error!(%url, %error, "lecture fragment fetch failed");
                error.to_string()
            },
        }
    }

    /// Run the rewriting pass over an already-fetched fragment body.
    pub async fn localize(&self, html: &str, lecture_url: &str) -> String {
        let lecture_base = basename(lecture_url).to_string();
        let lecture_name = lecture_base.rsplit('/').next().unwrap_or_default().to_string();
        let setup = RewriteSetup {
            redactions: &self.redactions,
            colorizer: &self.colorizer,
            italicizer: &self.italicizer,
            diagrams: &self.diagrams,
            base_url: &self.base_url,
            lecture_base: &lecture_base,
            lecture_name: &lecture_name,
        };
        // Collect pass: discover the load blocks without any code in hand.
        let none = HashMap::new();
        let (_, targets) = Rewriter::new(&setup, &none).run(html);
        let mut fetched = HashMap::with_capacity(targets.len());
        for target in targets {
            let code = self.fetch_code(&target, &lecture_base).await;
            fetched.insert(target.id, code);
        }
        let (out, _) = Rewriter::new(&setup, &fetched).run(html);
        out
    }

    /// Fetch one code block's source, trim it, colorize it.
    async fn fetch_code(&self, target: &LoadTarget, lecture_base: &str) -> FetchedCode {
        let url = relativize(&target.href, lecture_base, &self.base_url);
        match self.source.fetch_text(&url).await {
            Ok(text) => {
                let trimmed = match &target.region {
                    Some(tag) => match extract_region(&text, tag) {
                        Ok(region) => region,
                        Err(error) => {
                            let error = &*error;
                            tracing::warn!(%url, %error, "bad region tag; redacting instead");
                            redact(&text)
                        },
                    },
                    None => redact(&text),
                };
                let html = self.colorizer.colorize(&trimmed, SourceKind::Raw);
                FetchedCode::Loaded { url, html }
            },
            Err(error) => {
                let error = &*error;
                tracing::error!(%url, %error, "code fetch failed");
                FetchedCode::Failed(format!("could not read source code file at {url}: {error}"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_fetch::MockSource;

    const BASE: &str = "https://site.edu/course";

    fn loader(source: MockSource) -> Loader<MockSource> {
        Loader::new(source, BASE)
    }

    #[tokio::test]
    async fn test_idle_without_lecture_id() {
        let out = loader(MockSource::new()).load(&PageQuery::default()).await;
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_loads_and_localizes_fragment() {
        let source = MockSource::new().with(
            "https://site.edu/course/lectures/intro/index.html",
            "<h1>Intro</h1><img src=\"https://site.edu/course/images/fig.png\">",
        );
        let query = PageQuery::parse("?id=intro");
        let out = loader(source).load(&query).await.unwrap();
        assert_eq!(
            out,
            "<h1>Intro</h1><img src=\"https://site.edu/course/lectures/intro/images/fig.png\">"
        );
    }

    #[tokio::test]
    async fn test_fragment_fetch_failure_becomes_body() {
        let out = loader(MockSource::new()).load_lecture("intro").await;
        assert_eq!(
            out,
            "could not read from https://site.edu/course/lectures/intro/index.html: error 404"
        );
    }

    #[tokio::test]
    async fn test_code_block_fetched_redacted_and_colorized() {
        let source = MockSource::new()
            .with(
                "https://site.edu/course/lectures/intro/index.html",
                "<pre class=\"load\"><a href=\"https://site.edu/course/code/Stack.java\">Stack.java</a></pre>",
            )
            .with(
                "https://site.edu/course/lectures/intro/code/Stack.java",
                "class Stack {}\n/* Rest not in notes */\nhidden\n",
            );
        let out = loader(source).load_lecture("intro").await;
        assert!(out.starts_with("<pre id=\"pre_node_intro_1\" class=\"load\">"));
        assert!(out.contains(
            "<a class=\"pre\" href=\"https://site.edu/course/lectures/intro/code/Stack.java\" \
             title=\"Click to download code\">"
        ));
        assert!(out.contains("<span class=\"keyword\">class</span> Stack {}"));
        assert!(!out.contains("hidden"));
    }

    #[tokio::test]
    async fn test_code_block_region_extraction() {
        let source = MockSource::new()
            .with(
                "https://site.edu/course/lectures/intro/index.html",
                "<pre class=\"load\" data-region=\"push\"><a href=\"https://site.edu/course/code/S.java\">S</a></pre>",
            )
            .with(
                "https://site.edu/course/lectures/intro/code/S.java",
                "before\n(* Begin push *)\nvoid push() {}\n(* End push *)\nafter\n",
            );
        let out = loader(source).load_lecture("intro").await;
        assert!(out.contains("void push() {}"));
        assert!(!out.contains("before"));
        assert!(!out.contains("after"));
    }

    #[tokio::test]
    async fn test_code_fetch_failure_embeds_message_inline() {
        let source = MockSource::new().with(
            "https://site.edu/course/lectures/intro/index.html",
            "<p>kept</p><pre class=\"load\"><a href=\"https://site.edu/course/code/Missing.java\">m</a></pre>",
        );
        let out = loader(source).load_lecture("intro").await;
        assert!(out.starts_with("<p>kept</p>"));
        assert!(out.contains(
            "could not read source code file at \
             https://site.edu/course/lectures/intro/code/Missing.java"
        ));
    }

    #[tokio::test]
    async fn test_redactions_filter_sections_and_their_code() {
        let source = MockSource::new().with(
            "https://site.edu/course/lectures/intro/index.html",
            "<section id=\"keep\"><p>shown</p></section>\
             <section id=\"drop\"><pre class=\"load\"><a href=\"X.java\">x</a></pre></section>",
        );
        let redactions = ["drop".to_string()].into_iter().collect();
        let out = loader(source).with_redactions(redactions).load_lecture("intro").await;
        assert_eq!(out, "<section id=\"keep\"><p>shown</p></section>");
        // The redacted block's code URL was never requested; a request for
        // it would have produced an inline 404 message.
        assert!(!out.contains("could not read"));
    }
}
