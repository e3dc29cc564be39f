//! Markdown to HTML fragments for the story front end.

use pulldown_cmark::{html, Options, Parser};

/// Render lightweight Markdown into an HTML fragment.
///
/// Empty or whitespace-only input yields an empty string. Raw HTML in the
/// source is passed through untouched.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}
