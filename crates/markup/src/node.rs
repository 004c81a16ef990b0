//! A small builder for HTML trees.
//!
//! Elements are assembled with chainable constructors and rendered to an
//! HTML string with text and attribute escaping. One constructor function
//! per common tag lives in [`tags`].

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Tags rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escape text-node content.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape an attribute value for double-quoted position.
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// One node of an HTML tree: an element, escaped text, or a pre-rendered
/// markup string spliced in verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}
impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Markup inserted without escaping. The caller vouches for it.
    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    pub(crate) fn write(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Raw(html) => out.push_str(html),
        }
    }
}
impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::text(text)
    }
}
impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.render())
    }
}

/// An element under construction. Attributes keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}
impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attrs: Vec::new(), children: Vec::new() }
    }

    /// Set an attribute, replacing an earlier value for the same name.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        match self.attrs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value.into(),
            None => self.attrs.push((name, value.into())),
        }
        self
    }

    #[must_use]
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    #[must_use]
    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    pub(crate) fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}
impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.render())
    }
}

macro_rules! tag_constructors {
    ($($name:ident)*) => {$(
        #[doc = concat!("Create an empty `<", stringify!($name), ">` element.")]
        pub fn $name() -> Element {
            Element::new(stringify!($name))
        }
    )*};
}

/// One constructor per tag the notes pages build.
pub mod tags {
    use super::Element;

    tag_constructors! {
        ul li ol p b i em table thead tbody tr td th div span h1 h2 h3 h4 a br hr input
        blockquote select option sup sub strong pre canvas button img form textarea kbd code
    }
}
