use scraper::ElementRef;

pub mod extractor;
pub mod listing;
pub mod pagination;

pub use extractor::{ContentExtractor, ExtractedArticle};
pub use listing::ArticleLister;
pub use pagination::PageDiscovery;

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    const BLOCK_TAGS: &[&str] = &[
        "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
        "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
        "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
    ];
    const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Rendered-ish text of an element: block boundaries become whitespace,
    /// script and style bodies are dropped.
    pub fn visible_text(element: ElementRef) -> String {
        let mut out = String::new();
        push_text(element, &mut out);
        out
    }

    fn push_text(element: ElementRef, out: &mut String) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                let name = child_element.value().name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                push_text(child_element, out);
                if block {
                    out.push('\n');
                }
            } else if let Some(text) = child.value().as_text() {
                out.push_str(text);
            }
        }
    }

    /// Collapsed, trimmed visible text; `None` when nothing is left.
    pub fn clean_text(element: ElementRef) -> Option<String> {
        let text = collapse_whitespace(&visible_text(element));
        (!text.is_empty()).then_some(text)
    }
}
