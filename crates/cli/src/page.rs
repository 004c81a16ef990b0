//! The shell page wrapped around an assembled lecture body.
//!
//! The template is embedded into the binary and carries the client-side
//! affordances the assembled markup expects: the show-answer click wiring
//! and the math typesetting trigger.

use miette::miette;
use rust_embed::Embed;
use upon::Engine;

const SHELL: &str = "shell.html";

#[derive(Embed)]
#[folder = "templates/"]
struct Assets;

/// Render the full page: `content` is trusted markup, `title` is escaped.
pub fn render(title: &str, content: &str) -> miette::Result<String> {
    let asset = Assets::get(SHELL).ok_or_else(|| miette!("missing embedded template {SHELL}"))?;
    let source = String::from_utf8_lossy(&asset.data).into_owned();
    let engine = Engine::new();
    let template = engine.compile(source).map_err(|error| miette!("{error}"))?;
    template
        .render(&engine, upon::value! { title: lectern_markup::escape_text(title), content: content })
        .to_string()
        .map_err(|error| miette!("{error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_body_into_shell() {
        let page = render("intro", "<p>hello</p>").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>intro</title>"));
        assert!(page.contains("<p>hello</p>"));
        assert!(page.contains("MathJax.typeset()"));
    }

    #[test]
    fn test_title_is_escaped_but_content_is_not() {
        let page = render("a<b", "<b>x</b>").unwrap();
        assert!(page.contains("<title>a&lt;b</title>"));
        assert!(page.contains("<b>x</b>"));
    }
}
