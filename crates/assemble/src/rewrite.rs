//! The rewriting pass over a parsed lecture fragment.
//!
//! One walk of the tree re-emits the fragment as HTML while applying the
//! localization transforms: redaction, URL relativization, code coloring,
//! math italics, answer scaffolding and diagram dispatch.

use crate::diagram::DiagramRegistry;
use crate::relativize::relativize;
use lectern_colorize::{Colorizer, SourceKind};
use lectern_markup::{Element, MathItalicizer, Node, escape_attr, escape_text, is_void, tags};
use scraper::Node as DomNode;
use scraper::{ElementRef, Html};
use std::collections::{HashMap, HashSet};

/// What the loader fetched for one `pre.load` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchedCode {
    /// Colorized markup ready to splice, linked back to its source URL.
    Loaded { url: String, html: String },
    /// The fetch failed; the message becomes the block's content.
    Failed(String),
}

/// A `pre.load` block discovered during the collect pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadTarget {
    pub id: String,
    pub href: String,
    pub region: Option<String>,
}

/// Per-lecture transform context shared by both rewriter passes.
pub(crate) struct RewriteSetup<'a> {
    pub redactions: &'a HashSet<String>,
    pub colorizer: &'a Colorizer,
    pub italicizer: &'a MathItalicizer,
    pub diagrams: &'a DiagramRegistry,
    pub base_url: &'a str,
    pub lecture_base: &'a str,
    pub lecture_name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    /// Ordinary flow: all transforms apply.
    Normal,
    /// Inside math-classed markup: text nodes get italicized.
    Math,
    /// Inside a pre/code subtree being re-serialized for the colorizer:
    /// only URL rewriting applies.
    Plain,
}

pub(crate) struct Rewriter<'a> {
    setup: &'a RewriteSetup<'a>,
    fetched: &'a HashMap<String, FetchedCode>,
    targets: Vec<LoadTarget>,
    nodenum: usize,
}
impl<'a> Rewriter<'a> {
    pub fn new(setup: &'a RewriteSetup<'a>, fetched: &'a HashMap<String, FetchedCode>) -> Self {
        Self { setup, fetched, targets: Vec::new(), nodenum: 0 }
    }

    /// Rewrite the fragment, returning the emitted HTML and the `pre.load`
    /// targets encountered in document order.
    ///
    /// Running with an empty `fetched` map is the collect pass; running
    /// again after fetching fills the load blocks. Both passes walk the
    /// tree identically, so generated node ids line up.
    pub fn run(mut self, html: &str) -> (String, Vec<LoadTarget>) {
        let document = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len() * 2);
        self.emit_children(document.root_element(), &mut out, TextMode::Normal);
        (out, self.targets)
    }

    fn emit_children(&mut self, parent: ElementRef<'_>, out: &mut String, mode: TextMode) {
        // While a redacted header's region is being skipped, this holds the
        // header level that ends the skip.
        let mut redacting: Option<u8> = None;
        for child in parent.children() {
            if let Some(level) = redacting {
                match child.value() {
                    DomNode::Element(element)
                        if header_level(element.name()).is_some_and(|l| l <= level) =>
                    {
                        redacting = None;
                    },
                    _ => continue,
                }
            }
            match child.value() {
                DomNode::Text(text) => self.emit_text(text, out, mode),
                DomNode::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                },
                DomNode::Element(element) => {
                    let Some(el) = ElementRef::wrap(child) else { continue };
                    if mode != TextMode::Plain {
                        if element.name() == "section"
                            && element.id().is_some_and(|id| self.setup.redactions.contains(id))
                        {
                            continue;
                        }
                        if let Some(level) = header_level(element.name())
                            && self.is_redacted_header(el)
                        {
                            redacting = Some(level);
                            continue;
                        }
                    }
                    self.emit_element(el, out, mode);
                },
                _ => {},
            }
        }
    }

    fn emit_text(&self, text: &str, out: &mut String, mode: TextMode) {
        match mode {
            TextMode::Math if MathItalicizer::has_letters(text) => {
                out.push_str(&self.setup.italicizer.italicize_text(text).render());
            },
            _ => out.push_str(&escape_text(text)),
        }
    }

    fn emit_element(&mut self, el: ElementRef<'_>, out: &mut String, mode: TextMode) {
        let element = el.value();
        let tag = element.name();
        let hidden = mode != TextMode::Plain && has_class(element, "answer");
        if hidden {
            out.push_str(&show_answer_control().render());
        }
        if mode != TextMode::Plain {
            if has_class(element, "graphics") {
                self.emit_diagram(el, out);
                return;
            }
            if tag == "pre"
                && has_class(element, "load")
                && let Some(anchor) = first_child_anchor(el)
            {
                self.emit_load_block(el, anchor, out, hidden);
                return;
            }
            if tag == "pre" || tag == "code" {
                self.emit_colorized(el, out, hidden);
                return;
            }
        }
        self.emit_tag(el, out, hidden, None);
        if is_void(tag) {
            return;
        }
        match tag {
            // Raw-text elements; their content is not markup.
            "script" | "style" => {
                for text in el.text() {
                    out.push_str(text);
                }
            },
            _ => self.emit_children(el, out, child_mode(element, mode)),
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    /// A load block's single anchor names the code to fetch; its body is
    /// replaced with the colorized code, itself hyperlinked so clicking
    /// retrieves the whole file.
    fn emit_load_block(
        &mut self,
        el: ElementRef<'_>,
        anchor: ElementRef<'_>,
        out: &mut String,
        hidden: bool,
    ) {
        let element = el.value();
        let generated;
        let id = match element.id() {
            Some(id) if !id.is_empty() => id,
            _ => {
                self.nodenum += 1;
                generated = format!("pre_node_{}_{}", self.setup.lecture_name, self.nodenum);
                generated.as_str()
            },
        };
        let href = anchor.value().attr("href").unwrap_or_default().to_string();
        let region = element.attr("data-region").map(str::to_string);
        self.targets.push(LoadTarget { id: id.to_string(), href, region });

        let forced = element.id().filter(|id| !id.is_empty()).is_none().then_some(id);
        self.emit_tag(el, out, hidden, forced);
        match self.fetched.get(id) {
            Some(FetchedCode::Loaded { url, html }) => {
                let link = tags::a()
                    .class("pre")
                    .attr("href", url.as_str())
                    .attr("title", "Click to download code")
                    .child(Node::raw(html.as_str()));
                out.push_str(&link.render());
            },
            Some(FetchedCode::Failed(message)) => out.push_str(&escape_text(message)),
            None => {},
        }
        out.push_str("</pre>");
    }

    fn emit_colorized(&mut self, el: ElementRef<'_>, out: &mut String, hidden: bool) {
        self.emit_tag(el, out, hidden, None);
        let mut inner = String::new();
        self.emit_children(el, &mut inner, TextMode::Plain);
        out.push_str(&self.setup.colorizer.colorize(&inner, SourceKind::Markup));
        out.push_str("</");
        out.push_str(el.value().name());
        out.push('>');
    }

    fn emit_diagram(&self, el: ElementRef<'_>, out: &mut String) {
        let source: String = el.text().collect();
        match el.value().attr("data-diagram") {
            Some(name) => {
                if let Some(node) = self.setup.diagrams.render(name, &source) {
                    out.push_str(&node.render());
                }
            },
            None => tracing::debug!("graphics element without data-diagram attribute"),
        }
    }

    fn emit_tag(&self, el: ElementRef<'_>, out: &mut String, hidden: bool, forced_id: Option<&str>) {
        let element = el.value();
        let tag = element.name();
        out.push('<');
        out.push_str(tag);
        if let Some(id) = forced_id {
            out.push_str(" id=\"");
            out.push_str(&escape_attr(id));
            out.push('"');
        }
        let mut styled = false;
        for (name, value) in element.attrs() {
            if forced_id.is_some() && name == "id" {
                continue;
            }
            let value = match (tag, name) {
                ("img" | "source", "src") | ("a", "href") => {
                    relativize(value, self.setup.lecture_base, self.setup.base_url)
                },
                _ if hidden && name == "style" => {
                    styled = true;
                    merge_display_none(value)
                },
                _ => value.to_string(),
            };
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(&value));
            out.push('"');
        }
        if hidden && !styled {
            out.push_str(" style=\"display: none\"");
        }
        out.push('>');
    }

    fn is_redacted_header(&self, el: ElementRef<'_>) -> bool {
        if el.value().id().is_some_and(|id| self.setup.redactions.contains(id)) {
            return true;
        }
        let text: String = el.text().collect();
        self.setup.redactions.contains(text.trim())
    }
}

fn child_mode(element: &scraper::node::Element, mode: TextMode) -> TextMode {
    match mode {
        TextMode::Plain => TextMode::Plain,
        _ if has_class(element, "m") || has_class(element, "math") => TextMode::Math,
        TextMode::Math if has_class(element, "noital") || has_class(element, "math_ital") => {
            TextMode::Normal
        },
        other => other,
    }
}

fn has_class(element: &scraper::node::Element, class: &str) -> bool {
    element.classes().any(|c| c == class)
}

fn header_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn first_child_anchor(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let anchor = ElementRef::wrap(el.children().next()?)?;
    (anchor.value().name() == "a").then_some(anchor)
}

fn show_answer_control() -> Element {
    tags::p().class("showAnswer").child("(Show answer)")
}

fn merge_display_none(style: &str) -> String {
    let style = style.trim_end().trim_end_matches(';').trim_end();
    if style.is_empty() { "display: none".to_string() } else { format!("{style}; display: none") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_colorize::KeywordSet;

    fn rewrite_with(redactions: &HashSet<String>, html: &str) -> String {
        let colorizer = Colorizer::default();
        let italicizer = MathItalicizer::default();
        let diagrams = DiagramRegistry::new();
        let setup = RewriteSetup {
            redactions,
            colorizer: &colorizer,
            italicizer: &italicizer,
            diagrams: &diagrams,
            base_url: "https://site.edu/course",
            lecture_base: "https://site.edu/course/lectures/intro",
            lecture_name: "intro",
        };
        let fetched = HashMap::new();
        Rewriter::new(&setup, &fetched).run(html).0
    }

    fn rewrite(html: &str) -> String {
        rewrite_with(&HashSet::new(), html)
    }

    #[test]
    fn test_plain_markup_passes_through() {
        let html = "<p class=\"x\">hello <b>there</b></p>";
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn test_relativizes_img_and_anchor() {
        let out = rewrite("<img src=\"https://site.edu/course/images/fig.png\"><a href=\"https://site.edu/course/a.html\">a</a>");
        assert_eq!(
            out,
            "<img src=\"https://site.edu/course/lectures/intro/images/fig.png\"><a href=\"https://site.edu/course/lectures/intro/a.html\">a</a>"
        );
    }

    #[test]
    fn test_redacted_section_dropped() {
        let redactions = ["secret".to_string()].into_iter().collect();
        let out = rewrite_with(&redactions, "<p>a</p><section id=\"secret\"><p>b</p></section><p>c</p>");
        assert_eq!(out, "<p>a</p><p>c</p>");
    }

    #[test]
    fn test_redacted_header_removes_through_next_header() {
        let redactions = ["skipme".to_string()].into_iter().collect();
        let out = rewrite_with(
            &redactions,
            "<h2 id=\"skipme\">Hidden</h2><p>gone</p><h3>also gone</h3><p>still gone</p><h2>Kept</h2><p>kept</p>",
        );
        assert_eq!(out, "<h2>Kept</h2><p>kept</p>");
    }

    #[test]
    fn test_header_redacted_by_inner_text() {
        let redactions = ["Loop invariants".to_string()].into_iter().collect();
        let out = rewrite_with(&redactions, "<h1>Loop invariants</h1><p>gone</p>");
        assert_eq!(out, "");
    }

    #[test]
    fn test_higher_level_header_ends_redaction() {
        let redactions = ["skipme".to_string()].into_iter().collect();
        let out =
            rewrite_with(&redactions, "<h3 id=\"skipme\">x</h3><p>gone</p><h1>Top</h1><p>kept</p>");
        assert_eq!(out, "<h1>Top</h1><p>kept</p>");
    }

    #[test]
    fn test_math_class_italicizes_text() {
        let out = rewrite("<span class=\"m\">log n</span>");
        assert_eq!(
            out,
            "<span class=\"m\"><span class=\"math_ital\">log <i>n</i></span></span>"
        );
    }

    #[test]
    fn test_noital_subtree_left_alone() {
        let out = rewrite("<div class=\"math\"><span class=\"noital\">abc</span></div>");
        assert_eq!(out, "<div class=\"math\"><span class=\"noital\">abc</span></div>");
    }

    #[test]
    fn test_answer_gets_control_and_hidden_style() {
        let out = rewrite("<div class=\"answer\">42</div>");
        assert_eq!(
            out,
            "<p class=\"showAnswer\">(Show answer)</p><div class=\"answer\" style=\"display: none\">42</div>"
        );
    }

    #[test]
    fn test_answer_merges_existing_style() {
        let out = rewrite("<div class=\"answer\" style=\"color: red;\">x</div>");
        assert!(out.contains("style=\"color: red; display: none\""));
    }

    #[test]
    fn test_pre_contents_colorized() {
        let out = rewrite("<pre>if (x) return;</pre>");
        assert_eq!(
            out,
            "<pre><span class=\"keyword\">if</span> (x) <span class=\"keyword\">return</span>;</pre>"
        );
    }

    #[test]
    fn test_code_contents_colorized_once() {
        // A code element nested in a pre is colorized as part of the pre,
        // never a second time on its own.
        let out = rewrite("<pre><code>while (x) {}</code></pre>");
        assert_eq!(out, "<pre><code><span class=\"keyword\">while</span> (x) {}</code></pre>");
    }

    #[test]
    fn test_graphics_without_registry_dropped() {
        let out = rewrite("<p>a</p><script class=\"graphics\" data-diagram=\"tree\">grow</script>");
        assert_eq!(out, "<p>a</p>");
    }

    #[test]
    fn test_graphics_dispatched_to_registry() {
        let colorizer = Colorizer::new(KeywordSet::default(), Default::default());
        let italicizer = MathItalicizer::default();
        let mut diagrams = DiagramRegistry::new();
        diagrams.register("tree", |source: &str| {
            Ok(tags::canvas().class("diagram").child(source.trim()).into())
        });
        let redactions = HashSet::new();
        let setup = RewriteSetup {
            redactions: &redactions,
            colorizer: &colorizer,
            italicizer: &italicizer,
            diagrams: &diagrams,
            base_url: "https://site.edu/course",
            lecture_base: "https://site.edu/course/lectures/intro",
            lecture_name: "intro",
        };
        let fetched = HashMap::new();
        let (out, _) = Rewriter::new(&setup, &fetched)
            .run("<script class=\"graphics\" data-diagram=\"tree\"> grow </script>");
        assert_eq!(out, "<canvas class=\"diagram\">grow</canvas>");
    }

    #[test]
    fn test_collect_pass_records_load_targets() {
        let redactions = HashSet::new();
        let colorizer = Colorizer::default();
        let italicizer = MathItalicizer::default();
        let diagrams = DiagramRegistry::new();
        let setup = RewriteSetup {
            redactions: &redactions,
            colorizer: &colorizer,
            italicizer: &italicizer,
            diagrams: &diagrams,
            base_url: "https://site.edu/course",
            lecture_base: "https://site.edu/course/lectures/intro",
            lecture_name: "intro",
        };
        let fetched = HashMap::new();
        let html = "<pre class=\"load\"><a href=\"Stack.java\">Stack.java</a></pre>\
                    <pre class=\"load\" id=\"named\" data-region=\"push\"><a href=\"Queue.java\">q</a></pre>";
        let (_, targets) = Rewriter::new(&setup, &fetched).run(html);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "pre_node_intro_1");
        assert_eq!(targets[0].href, "Stack.java");
        assert_eq!(targets[0].region, None);
        assert_eq!(targets[1].id, "named");
        assert_eq!(targets[1].region.as_deref(), Some("push"));
    }

    #[test]
    fn test_load_block_in_redacted_section_not_collected() {
        let redactions: HashSet<String> = ["secret".to_string()].into_iter().collect();
        let colorizer = Colorizer::default();
        let italicizer = MathItalicizer::default();
        let diagrams = DiagramRegistry::new();
        let setup = RewriteSetup {
            redactions: &redactions,
            colorizer: &colorizer,
            italicizer: &italicizer,
            diagrams: &diagrams,
            base_url: "https://site.edu/course",
            lecture_base: "https://site.edu/course/lectures/intro",
            lecture_name: "intro",
        };
        let fetched = HashMap::new();
        let html = "<section id=\"secret\"><pre class=\"load\"><a href=\"X.java\">x</a></pre></section>";
        let (out, targets) = Rewriter::new(&setup, &fetched).run(html);
        assert_eq!(out, "");
        assert!(targets.is_empty());
    }

    #[test]
    fn test_load_block_without_anchor_is_plain_pre() {
        let out = rewrite("<pre class=\"load\">if x</pre>");
        assert_eq!(out, "<pre class=\"load\"><span class=\"keyword\">if</span> x</pre>");
    }

    #[test]
    fn test_load_block_fills_from_fetched_map() {
        let redactions = HashSet::new();
        let colorizer = Colorizer::default();
        let italicizer = MathItalicizer::default();
        let diagrams = DiagramRegistry::new();
        let setup = RewriteSetup {
            redactions: &redactions,
            colorizer: &colorizer,
            italicizer: &italicizer,
            diagrams: &diagrams,
            base_url: "https://site.edu/course",
            lecture_base: "https://site.edu/course/lectures/intro",
            lecture_name: "intro",
        };
        let mut fetched = HashMap::new();
        fetched.insert(
            "pre_node_intro_1".to_string(),
            FetchedCode::Loaded {
                url: "https://site.edu/course/lectures/intro/Stack.java".to_string(),
                html: "<span class=\"keyword\">class</span> Stack".to_string(),
            },
        );
        let html = "<pre class=\"load\"><a href=\"Stack.java\">Stack.java</a></pre>";
        let (out, _) = Rewriter::new(&setup, &fetched).run(html);
        assert_eq!(
            out,
            "<pre id=\"pre_node_intro_1\" class=\"load\">\
             <a class=\"pre\" href=\"https://site.edu/course/lectures/intro/Stack.java\" title=\"Click to download code\">\
             <span class=\"keyword\">class</span> Stack</a></pre>"
        );
    }
}
