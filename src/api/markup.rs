//! Comment markup rendering
//!
//! Post comments arrive as HTML fragments: quote links, `<br>` line breaks,
//! spoiler spans and escaped entities. Archives and console output want the
//! text a reader would see.

use scraper::{Html, Node};

/// Renders a comment's HTML markup to plain text
///
/// `<br>` becomes a newline, every other tag is dropped and entities are
/// decoded.
///
/// # Example
///
/// ```
/// use chan_archiver::api::comment_to_text;
///
/// let text = comment_to_text("&gt;&gt;123<br>nice &amp; tidy");
/// assert_eq!(text, ">>123\nnice & tidy");
/// ```
pub fn comment_to_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut text = String::with_capacity(markup.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(element) if element.name() == "br" => text.push('\n'),
            _ => {}
        }
    }

    text
}
