use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use scribe_core::{Article, ArticleId, ArticleStore, ArticleUpdate, Error, NewArticle, Result};
use tokio::sync::RwLock;

use crate::StorageBackend;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, limit: usize) -> Vec<Article> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        articles.truncate(limit);
        articles
    }

    pub fn find_or_create(&mut self, source_url: &str, defaults: NewArticle) -> (Article, bool) {
        if let Some(existing) = self.articles.iter().find(|a| a.source_url == source_url) {
            return (existing.clone(), false);
        }
        self.next_id += 1;
        let article = Article::create(ArticleId(self.next_id), source_url, defaults, Utc::now());
        self.articles.push(article.clone());
        (article, true)
    }

    pub fn update(&mut self, id: ArticleId, update: ArticleUpdate) -> Result<Article> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(Error::NotFound(id))?;
        article.apply_update(update, Utc::now())?;
        Ok(article.clone())
    }

    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }
}

/// Process-local store. The write lock is held across the existence check and the
/// insert, so `find_or_create` never produces two rows for one source URL.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_url: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn list(&self, limit: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.list(limit))
    }

    async fn find_or_create(
        &self,
        source_url: &str,
        defaults: NewArticle,
    ) -> Result<(Article, bool)> {
        let mut store = self.store.write().await;
        Ok(store.find_or_create(source_url, defaults))
    }

    async fn update(&self, id: ArticleId, update: ArticleUpdate) -> Result<Article> {
        let mut store = self.store.write().await;
        store.update(id, update)
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.get(id))
    }
}
