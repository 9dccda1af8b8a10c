use std::sync::Arc;

use async_trait::async_trait;
use scribe_core::{ArticleStore, Error, Result};

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn connect(url: Option<&str>) -> Result<Self>
    where
        Self: Sized;
}

/// Builds the store named on the command line (`memory` or `sqlite`).
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStorage::connect(url).await?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SQLiteStorage::connect(url).await.map_err(|e| {
            Error::Persistence(format!("{} ({})", SQLiteStorage::get_error_message(), e))
        })?)),
        other => Err(Error::Config(format!("Unsupported storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_storage() {
        let store = create_storage("memory", None).await.unwrap();
        assert!(store.list(10).await.unwrap().is_empty());

        let err = create_storage("qdrant", None).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
