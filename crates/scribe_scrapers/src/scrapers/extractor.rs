use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Html;
use scribe_core::{BrowserSession, Error, NewArticle, Page, Result};

use crate::scrapers::utils;
use crate::selectors::{ARTICLE_AUTHOR, ARTICLE_CONTENT, ARTICLE_DATE, ARTICLE_TITLE};

pub const NO_TITLE: &str = "No Title";

/// Raw fields read off one article page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    pub title: String,
    pub content_html: String,
    pub content_text: String,
    pub author: Option<String>,
    /// `datetime` attribute or display text of the first date-like element.
    pub published: Option<String>,
}

impl ExtractedArticle {
    /// Converts to the storable form. A missing or unreadable date becomes `scraped_at`.
    pub fn into_new_article(self, scraped_at: DateTime<Utc>) -> NewArticle {
        let published_date = self
            .published
            .as_deref()
            .and_then(parse_published_date)
            .unwrap_or(scraped_at);
        NewArticle {
            title: self.title,
            original_content_html: self.content_html,
            original_content_text: self.content_text,
            author: self.author,
            published_date: Some(published_date),
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: absent elements fall back to defaults.
    pub fn extract(page: &Page) -> ExtractedArticle {
        let document = Html::parse_document(&page.html);

        let title = ARTICLE_TITLE
            .first(&document)
            .and_then(utils::clean_text)
            .unwrap_or_else(|| NO_TITLE.to_string());

        let (content_html, content_text) = ARTICLE_CONTENT
            .first(&document)
            .map(|el| {
                let text = utils::clean_text(el).unwrap_or_default();
                (el.inner_html(), text)
            })
            .unwrap_or_default();

        let author = ARTICLE_AUTHOR.first(&document).and_then(utils::clean_text);

        let published = ARTICLE_DATE.first(&document).and_then(|el| {
            el.value()
                .attr("datetime")
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .or_else(|| utils::clean_text(el))
        });

        ExtractedArticle {
            title,
            content_html,
            content_text,
            author,
            published,
        }
    }

    pub async fn fetch(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ExtractedArticle> {
        let page = session
            .goto(url)
            .await
            .map_err(|e| Error::Extraction(format!("Cannot load {}: {}", url, e)))?;
        Ok(Self::extract(&page))
    }
}

/// Accepts the formats blogs commonly put in `<time>` elements.
pub fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
        }
    }
    None
}
