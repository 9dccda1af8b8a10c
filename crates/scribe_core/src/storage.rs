use async_trait::async_trait;

use crate::types::{Article, ArticleId, ArticleUpdate, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Most recently created articles first, at most `limit` of them.
    async fn list(&self, limit: usize) -> Result<Vec<Article>>;

    /// Returns the stored article for `source_url`, inserting `defaults` only if
    /// none exists. The flag is true when a new row was created.
    async fn find_or_create(
        &self,
        source_url: &str,
        defaults: NewArticle,
    ) -> Result<(Article, bool)>;

    /// Stores the rewrite and flips `is_updated`. Fails if already enhanced.
    async fn update(&self, id: ArticleId, update: ArticleUpdate) -> Result<Article>;

    async fn get(&self, id: ArticleId) -> Result<Option<Article>>;
}
