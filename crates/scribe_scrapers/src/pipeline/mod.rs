use std::sync::Arc;

use scribe_core::{ArticleStore, Browser, Error, ExecutionTrace, RunReport, DEFAULT_CATEGORY};
use scribe_inference::ContentRewriter;

use crate::research::ResearchConfig;
use crate::scrapers::ArticleLister;

pub mod enhance;
pub mod scrape;

pub use enhance::{EnhanceSummary, EnhancementOrchestrator, EnhancementOutcome};
pub use scrape::{ScrapeOrchestrator, ScrapeSummary};

pub const DEFAULT_LISTING_URL: &str = "https://beyondchats.com/blogs/";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub listing_url: String,
    /// Articles taken from the last listing page per scrape run.
    pub scrape_batch_size: usize,
    /// Stored articles fetched per enhancement run before filtering to pending ones.
    pub enhance_fetch_limit: usize,
    pub default_category: String,
    pub research: ResearchConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            scrape_batch_size: ArticleLister::DEFAULT_BATCH_SIZE,
            enhance_fetch_limit: 100,
            default_category: DEFAULT_CATEGORY.to_string(),
            research: ResearchConfig::default(),
        }
    }
}

/// Everything a scrape or enhancement run needs, shared by the CLI and the web triggers.
#[derive(Clone)]
pub struct Pipeline {
    browser: Arc<dyn Browser>,
    store: Arc<dyn ArticleStore>,
    rewriter: Option<ContentRewriter>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        browser: Arc<dyn Browser>,
        store: Arc<dyn ArticleStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            browser,
            store,
            rewriter: None,
            config,
        }
    }

    pub fn with_rewriter(mut self, rewriter: ContentRewriter) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn scrape(&self) -> RunReport<ScrapeSummary> {
        ScrapeOrchestrator::new(self.browser.clone(), self.store.clone(), self.config.clone())
            .run()
            .await
    }

    /// Fails without touching the store when no completion model is configured.
    pub async fn enhance(&self) -> RunReport<EnhanceSummary> {
        match &self.rewriter {
            Some(rewriter) => {
                EnhancementOrchestrator::new(
                    self.browser.clone(),
                    self.store.clone(),
                    rewriter.clone(),
                    self.config.clone(),
                )
                .run()
                .await
            }
            None => {
                let mut trace = ExecutionTrace::new();
                let err = Error::Config("no completion model configured".to_string());
                trace.error(format!("Enhancement error: {}", err));
                RunReport { trace, outcome: Err(err) }
            }
        }
    }
}
