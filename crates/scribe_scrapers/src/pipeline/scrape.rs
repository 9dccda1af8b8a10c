use std::sync::Arc;

use chrono::Utc;
use scribe_core::{ArticleStore, Browser, BrowserSession, ExecutionTrace, Result, RunReport};
use serde::Serialize;
use url::Url;

use super::PipelineConfig;
use crate::scrapers::{ArticleLister, ContentExtractor, PageDiscovery};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeSummary {
    pub selected: usize,
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
}

/// Pulls the oldest articles off the listing and stores the ones not seen before.
pub struct ScrapeOrchestrator {
    browser: Arc<dyn Browser>,
    store: Arc<dyn ArticleStore>,
    config: PipelineConfig,
}

impl ScrapeOrchestrator {
    pub fn new(
        browser: Arc<dyn Browser>,
        store: Arc<dyn ArticleStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            browser,
            store,
            config,
        }
    }

    /// Runs one batch. The browsing session is closed on every exit path.
    pub async fn run(&self) -> RunReport<ScrapeSummary> {
        let mut trace = ExecutionTrace::new();
        trace.info(format!("Starting scraper ({} browser)...", self.browser.name()));

        let mut session = match self.browser.launch().await {
            Ok(session) => session,
            Err(e) => {
                trace.error(format!("Main scraper error: {}", e));
                return RunReport { trace, outcome: Err(e) };
            }
        };

        let outcome = self.scrape(session.as_mut(), &mut trace).await;
        if let Err(e) = session.close().await {
            trace.warn(format!("Failed to close browser session: {}", e));
        }

        match &outcome {
            Ok(summary) => trace.info(format!(
                "Scraping completed: {} new, {} already stored, {} failed",
                summary.created, summary.existing, summary.failed
            )),
            Err(e) => trace.error(format!("Main scraper error: {}", e)),
        }
        RunReport { trace, outcome }
    }

    async fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        trace: &mut ExecutionTrace,
    ) -> Result<ScrapeSummary> {
        let listing = PageDiscovery::new(&self.config.listing_url)
            .discover(session, trace)
            .await?;

        let lister = ArticleLister::new(self.config.scrape_batch_size);
        let found = ArticleLister::links(&listing);
        trace.info(format!("Found {} articles on the last page.", found.len()));
        let targets = lister.select_oldest(found);
        if targets.len() < self.config.scrape_batch_size {
            trace.warn(format!(
                "Found fewer than {} articles on the last page.",
                self.config.scrape_batch_size
            ));
        }

        let mut summary = ScrapeSummary {
            selected: targets.len(),
            ..Default::default()
        };
        for url in &targets {
            trace.info(format!("Scraping: {}", url));
            match self.scrape_one(session, url).await {
                Ok(true) => summary.created += 1,
                Ok(false) => {
                    trace.info(format!("Already stored, left unchanged: {}", url));
                    summary.existing += 1;
                }
                Err(e) => {
                    trace.error(format!("Error scraping {}: {}", url, e));
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn scrape_one(&self, session: &mut dyn BrowserSession, url: &Url) -> Result<bool> {
        let extracted = ContentExtractor::new().fetch(session, url.as_str()).await?;
        let mut article = extracted.into_new_article(Utc::now());
        article.category = Some(self.config.default_category.clone());
        let (_, created) = self.store.find_or_create(url.as_str(), article).await?;
        Ok(created)
    }
}
