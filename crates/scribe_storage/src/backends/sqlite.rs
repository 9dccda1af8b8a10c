use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use scribe_core::{Article, ArticleId, ArticleStore, ArticleUpdate, Error, NewArticle, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "scribe.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        original_content_html TEXT NOT NULL DEFAULT '',
        original_content_text TEXT NOT NULL DEFAULT '',
        author TEXT,
        published_date TEXT,
        source_url TEXT NOT NULL UNIQUE,
        is_updated INTEGER NOT NULL DEFAULT 0,
        updated_content TEXT,
        reference_urls TEXT,
        category TEXT NOT NULL DEFAULT 'General',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles (created_at)",
];

fn db_err(context: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |e| Error::Persistence(format!("{}: {}", context, e))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("Failed to parse date {}: {}", value, e)))
}

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: Option<PathBuf>,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable at the configured path"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        match url {
            Some(url) if url.starts_with("sqlite:") => {
                let options = SqliteConnectOptions::from_str(url)
                    .map_err(db_err("Invalid SQLite URL"))?
                    .create_if_missing(true);
                Self::with_options(options, None).await
            }
            Some(path) => Self::new_with_path(Path::new(path)).await,
            None => Self::new_with_path(Path::new(DEFAULT_DB_PATH)).await,
        }
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::with_options(options, Some(db_path.to_path_buf())).await
    }

    async fn with_options(options: SqliteConnectOptions, db_path: Option<PathBuf>) -> Result<Self> {
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(db_err("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Persistence(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool, db_path })
    }

    pub fn get_db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    async fn fetch_by_source(&self, source_url: &str) -> Result<Article> {
        let row = sqlx::query("SELECT * FROM articles WHERE source_url = ?")
            .bind(source_url)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to load article"))?;
        row_to_article(&row)
    }
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let get_err = db_err("Malformed article row");
    let references = row
        .try_get::<Option<String>, _>("reference_urls")
        .map_err(&get_err)?
        .map(|raw| serde_json::from_str::<Vec<String>>(&raw))
        .transpose()?;
    let published_date = row
        .try_get::<Option<String>, _>("published_date")
        .map_err(&get_err)?
        .map(|raw| parse_timestamp(&raw))
        .transpose()?;

    Ok(Article {
        id: ArticleId(row.try_get("id").map_err(&get_err)?),
        title: row.try_get("title").map_err(&get_err)?,
        original_content_html: row.try_get("original_content_html").map_err(&get_err)?,
        original_content_text: row.try_get("original_content_text").map_err(&get_err)?,
        author: row.try_get("author").map_err(&get_err)?,
        published_date,
        source_url: row.try_get("source_url").map_err(&get_err)?,
        is_updated: row.try_get("is_updated").map_err(&get_err)?,
        updated_content: row.try_get("updated_content").map_err(&get_err)?,
        references,
        category: row.try_get("category").map_err(&get_err)?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(&get_err)?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(&get_err)?)?,
    })
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn list(&self, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles ORDER BY created_at DESC, id DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list articles"))?;
        rows.iter().map(row_to_article).collect()
    }

    async fn find_or_create(
        &self,
        source_url: &str,
        defaults: NewArticle,
    ) -> Result<(Article, bool)> {
        let now = timestamp(Utc::now());
        let category = defaults
            .category
            .unwrap_or_else(|| scribe_core::DEFAULT_CATEGORY.to_string());

        let inserted = sqlx::query(
            r#"
            INSERT INTO articles
            (title, original_content_html, original_content_text, author, published_date,
             source_url, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(source_url) DO NOTHING
            "#,
        )
        .bind(&defaults.title)
        .bind(&defaults.original_content_html)
        .bind(&defaults.original_content_text)
        .bind(defaults.author.as_deref())
        .bind(defaults.published_date.map(timestamp))
        .bind(source_url)
        .bind(category)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to store article"))?
        .rows_affected();

        let article = self.fetch_by_source(source_url).await?;
        Ok((article, inserted == 1))
    }

    async fn update(&self, id: ArticleId, update: ArticleUpdate) -> Result<Article> {
        let references = serde_json::to_string(&update.references)?;
        let changed = sqlx::query(
            r#"
            UPDATE articles
            SET updated_content = ?, reference_urls = ?, is_updated = 1, updated_at = ?
            WHERE id = ? AND is_updated = 0
            "#,
        )
        .bind(&update.updated_content)
        .bind(references)
        .bind(timestamp(Utc::now()))
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update article"))?
        .rows_affected();

        match (changed, self.get(id).await?) {
            (1, Some(article)) => Ok(article),
            (_, Some(_)) => Err(Error::AlreadyEnhanced(id)),
            (_, None) => Err(Error::NotFound(id)),
        }
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to load article"))?;
        row.as_ref().map(row_to_article).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            original_content_html: format!("<p>{}</p>", title),
            original_content_text: title.to_string(),
            author: Some("Staff".to_string()),
            published_date: Some(Utc::now()),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");
        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(storage.get_db_path(), Some(db_path.as_path()));

        let (first, created) = storage
            .find_or_create("https://blog.test/a", new_article("A"))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.category, "General");
        assert_eq!(first.author.as_deref(), Some("Staff"));

        let (again, created) = storage
            .find_or_create("https://blog.test/a", new_article("Other"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(again.title, "A");

        storage
            .find_or_create("https://blog.test/b", new_article("B"))
            .await
            .unwrap();
        let listed = storage.list(10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "B");
    }

    #[tokio::test]
    async fn test_sqlite_update_once() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();
        let (article, _) = storage
            .find_or_create("https://blog.test/a", new_article("A"))
            .await
            .unwrap();
        let update = ArticleUpdate {
            updated_content: "# Rewritten".to_string(),
            references: vec!["https://one.test/x".to_string(), "https://two.test/y".to_string()],
        };

        let updated = storage.update(article.id, update.clone()).await.unwrap();
        assert!(updated.is_updated);
        assert_eq!(updated.references.as_ref().map(Vec::len), Some(2));
        assert_eq!(updated.original_content_text, "A");

        let err = storage.update(article.id, update.clone()).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyEnhanced(_)));
        let err = storage.update(ArticleId(404), update).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_url_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("articles.db");
        let url = db_path.to_str().unwrap();

        let storage = crate::create_storage("sqlite", Some(url)).await.unwrap();
        let (first, created) = storage
            .find_or_create("https://blog.test/a", new_article("A"))
            .await
            .unwrap();
        assert!(created);
        drop(storage);

        let reopened = crate::create_storage("sqlite", Some(url)).await.unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = reopened.clone();
                tokio::spawn(async move {
                    store
                        .find_or_create("https://blog.test/a", new_article(&i.to_string()))
                        .await
                })
            })
            .collect();
        for handle in handles {
            let (article, created) = handle.await.unwrap().unwrap();
            assert!(!created);
            assert_eq!(article.id, first.id);
        }
        let listed = reopened.list(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "A");
    }
}
