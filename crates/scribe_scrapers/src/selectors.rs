//! Ordered selector fallback chains.
//!
//! Markup on the source site has changed over time, so every lookup is an ordered
//! list of CSS selector families. The first family that matches at least one
//! element wins; later families are never consulted once one has matched.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use scribe_core::{Error, Result};

/// Runs `strategies` in order and returns the first non-empty result.
pub fn first_non_empty<S, T>(
    strategies: impl IntoIterator<Item = S>,
    mut run: impl FnMut(S) -> Vec<T>,
) -> Vec<T> {
    for strategy in strategies {
        let found = run(strategy);
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

#[derive(Debug, Clone)]
pub struct SelectorChain {
    families: Vec<(String, Selector)>,
}

impl SelectorChain {
    pub fn parse(families: &[&str]) -> Result<Self> {
        let families = families
            .iter()
            .map(|css| {
                Selector::parse(css)
                    .map(|selector| (css.to_string(), selector))
                    .map_err(|e| Error::Config(format!("Invalid selector {:?}: {:?}", css, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { families })
    }

    fn fixed(families: &[&str]) -> Self {
        Self::parse(families).expect("built-in selectors are valid CSS")
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|(css, _)| css.as_str())
    }

    /// All elements matched by the first family with at least one match, in document order.
    pub fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        first_non_empty(&self.families, |(_, selector)| document.select(selector).collect())
    }

    pub fn first<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.select(document).into_iter().next()
    }
}

lazy_static! {
    pub static ref PAGINATION_LINKS: SelectorChain = SelectorChain::fixed(&[
        ".pagination a",
        ".page-numbers a",
        ".nav-links a",
        "a.page-numbers",
    ]);
    pub static ref LISTING_LINKS: SelectorChain = SelectorChain::fixed(&[
        "article h2 a",
        "article h3 a",
        ".post-title a",
        ".entry-title a",
        ".blog-post a.title",
    ]);
    pub static ref ARTICLE_TITLE: SelectorChain = SelectorChain::fixed(&["h1, .entry-title, .post-title"]);
    pub static ref ARTICLE_CONTENT: SelectorChain =
        SelectorChain::fixed(&[".entry-content, .post-content, article .content, .blog-content"]);
    pub static ref ARTICLE_AUTHOR: SelectorChain = SelectorChain::fixed(&[".author, .entry-author, .posted-by"]);
    pub static ref ARTICLE_DATE: SelectorChain = SelectorChain::fixed(&["time, .published, .date, .entry-date"]);
    pub static ref SEARCH_RESULTS: SelectorChain = SelectorChain::fixed(&["div.g a", "a.result__a", "#search a"]);
    pub static ref REFERENCE_HEADINGS: SelectorChain = SelectorChain::fixed(&["h1, h2, h3"]);
    pub static ref REFERENCE_PARAGRAPHS: SelectorChain = SelectorChain::fixed(&["p"]);
}
