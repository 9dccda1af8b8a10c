use scraper::Html;
use scribe_core::Page;
use url::Url;

use crate::selectors::LISTING_LINKS;

/// Picks the oldest article links from a listing page.
#[derive(Debug, Clone, Copy)]
pub struct ArticleLister {
    batch_size: usize,
}

impl ArticleLister {
    pub const DEFAULT_BATCH_SIZE: usize = 5;

    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Article links as they appear on the page (newest first).
    pub fn links(page: &Page) -> Vec<Url> {
        let document = Html::parse_document(&page.html);
        LISTING_LINKS
            .select(&document)
            .into_iter()
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| page.resolve(href))
            .collect()
    }

    /// Reverses newest-first links and keeps the first `batch_size`. A short page is
    /// returned as-is; earlier pages are not consulted.
    pub fn select_oldest(&self, mut links: Vec<Url>) -> Vec<Url> {
        links.reverse();
        links.truncate(self.batch_size);
        links
    }

    pub fn list(&self, page: &Page) -> Vec<Url> {
        self.select_oldest(Self::links(page))
    }
}

impl Default for ArticleLister {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(count: usize) -> Page {
        // Post 1 is the newest and appears first.
        let articles = (1..=count)
            .map(|i| {
                format!(r#"<article><h2><a href="/blogs/post-{i}/">Post {i}</a></h2></article>"#)
            })
            .collect::<String>();
        Page {
            url: Url::parse("https://blog.test/blogs/page/14/").unwrap(),
            html: format!("<main>{}</main>", articles),
        }
    }

    #[test]
    fn test_keeps_five_oldest_oldest_first() {
        let urls = ArticleLister::default().list(&listing(8));
        let paths: Vec<_> = urls.iter().map(|u| u.path().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "/blogs/post-8/",
                "/blogs/post-7/",
                "/blogs/post-6/",
                "/blogs/post-5/",
                "/blogs/post-4/",
            ]
        );
    }

    #[test]
    fn test_short_page_is_accepted() {
        let urls = ArticleLister::default().list(&listing(3));
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0].path(), "/blogs/post-3/");
    }

    #[test]
    fn test_links_resolve_against_page_and_fall_back() {
        let page = Page {
            url: Url::parse("https://blog.test/blogs/").unwrap(),
            html: r#"<div class="entry-title"><a href="https://blog.test/x/">X</a></div>
                     <div class="entry-title"><a>no href</a></div>
                     <div class="entry-title"><a href="y/">Y</a></div>"#
                .to_string(),
        };
        let links: Vec<_> = ArticleLister::links(&page).into_iter().map(String::from).collect();
        assert_eq!(links, vec!["https://blog.test/x/", "https://blog.test/blogs/y/"]);
    }

    #[test]
    fn test_empty_listing() {
        let page = Page {
            url: Url::parse("https://blog.test/").unwrap(),
            html: "<p>nothing here</p>".to_string(),
        };
        assert!(ArticleLister::default().list(&page).is_empty());
    }
}
