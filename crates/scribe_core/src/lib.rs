pub mod browser;
pub mod error;
pub mod models;
pub mod storage;
pub mod trace;
pub mod types;

pub use browser::{Browser, BrowserSession, Page};
pub use error::Error;
pub use models::CompletionModel;
pub use storage::ArticleStore;
pub use trace::{ExecutionTrace, RunReport, TraceEntry, TraceLevel};
pub use types::{Article, ArticleId, ArticleUpdate, NewArticle, Reference, DEFAULT_CATEGORY};

pub type Result<T> = std::result::Result<T, Error>;
