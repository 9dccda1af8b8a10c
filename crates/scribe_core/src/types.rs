use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_CATEGORY: &str = "General";

/// Store-assigned article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub original_content_html: String,
    pub original_content_text: String,
    pub author: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub source_url: String,
    pub is_updated: bool,
    pub updated_content: Option<String>,
    pub references: Option<Vec<String>>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Builds the stored form of a freshly scraped article.
    pub fn create(id: ArticleId, source_url: &str, new: NewArticle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            original_content_html: new.original_content_html,
            original_content_text: new.original_content_text,
            author: new.author,
            published_date: new.published_date,
            source_url: source_url.to_string(),
            is_updated: false,
            updated_content: None,
            references: None,
            category: new.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.is_updated
    }

    /// Text handed to the rewriter: plain text, or the HTML when no text was extracted.
    pub fn rewrite_source(&self) -> &str {
        if self.original_content_text.trim().is_empty() {
            &self.original_content_html
        } else {
            &self.original_content_text
        }
    }

    /// Records the enhancement. An article is enhanced at most once.
    pub fn apply_update(&mut self, update: ArticleUpdate, now: DateTime<Utc>) -> Result<()> {
        if self.is_updated {
            return Err(Error::AlreadyEnhanced(self.id));
        }
        self.updated_content = Some(update.updated_content);
        self.references = Some(update.references);
        self.is_updated = true;
        self.updated_at = now;
        Ok(())
    }
}

/// Fields captured by the extractor for an article that is not stored yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub original_content_html: String,
    pub original_content_text: String,
    pub author: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub updated_content: String,
    pub references: Vec<String>,
}

/// External page used as grounding for a rewrite. Only the URL outlives the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub url: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Article {
        Article::create(
            ArticleId(1),
            "https://blog.test/a",
            NewArticle {
                title: "A".to_string(),
                original_content_html: "<p>Body</p>".to_string(),
                original_content_text: "Body".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_create_defaults() {
        let article = sample();
        assert!(article.is_pending());
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert!(article.updated_content.is_none());
        assert!(article.references.is_none());
    }

    #[test]
    fn test_rewrite_source_falls_back_to_html() {
        let mut article = sample();
        assert_eq!(article.rewrite_source(), "Body");
        article.original_content_text = "  ".to_string();
        assert_eq!(article.rewrite_source(), "<p>Body</p>");
    }

    #[test]
    fn test_apply_update_is_one_way() {
        let mut article = sample();
        let update = ArticleUpdate {
            updated_content: "# New".to_string(),
            references: vec!["https://ref.test/1".to_string()],
        };
        article.apply_update(update.clone(), Utc::now()).unwrap();
        assert!(article.is_updated);
        assert_eq!(article.updated_content.as_deref(), Some("# New"));

        let err = article.apply_update(update, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::AlreadyEnhanced(ArticleId(1))));
    }
}
