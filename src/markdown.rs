//! Converts post bodies from markdown to HTML. The conversion itself is
//! delegated to [`pulldown_cmark`]; the output is trusted and embedded into
//! templates verbatim. Plain metadata text goes through [`escape`] instead.

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, Options, Parser};

/// Converts `markdown` into an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Escapes `text` for embedding in HTML. Templates are executed with
/// text/template semantics, so anything that isn't already HTML must be
/// escaped before it reaches them.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a `String` can't fail.
    let _ = escape_html(&mut out, text);
    out
}
