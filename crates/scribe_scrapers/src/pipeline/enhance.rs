use std::sync::Arc;

use scribe_core::{
    Article, ArticleStore, ArticleUpdate, Browser, BrowserSession, ExecutionTrace, Result,
    RunReport,
};
use scribe_inference::ContentRewriter;
use serde::Serialize;

use super::PipelineConfig;
use crate::research::ReferenceResearcher;

/// How one pending article left an enhancement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementOutcome {
    Enhanced { references: Vec<String> },
    /// No usable references; the article stays pending.
    Skipped,
    /// Rewrite or persistence failed; the article stays pending.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceSummary {
    pub pending: usize,
    pub enhanced: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl EnhanceSummary {
    fn record(&mut self, outcome: &EnhancementOutcome) {
        match outcome {
            EnhancementOutcome::Enhanced { .. } => self.enhanced += 1,
            EnhancementOutcome::Skipped => self.skipped += 1,
            EnhancementOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct EnhancementOrchestrator {
    browser: Arc<dyn Browser>,
    store: Arc<dyn ArticleStore>,
    researcher: ReferenceResearcher,
    rewriter: ContentRewriter,
    config: PipelineConfig,
}

impl EnhancementOrchestrator {
    pub fn new(
        browser: Arc<dyn Browser>,
        store: Arc<dyn ArticleStore>,
        rewriter: ContentRewriter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            browser,
            store,
            researcher: ReferenceResearcher::new(config.research.clone()),
            rewriter,
            config,
        }
    }

    /// Enhances every pending article in the fetched page, one at a time.
    pub async fn run(&self) -> RunReport<EnhanceSummary> {
        let mut trace = ExecutionTrace::new();
        trace.info(format!("Starting enhancement with {}...", self.rewriter.model_name()));
        let outcome = self.enhance_pending(&mut trace).await;
        match &outcome {
            Ok(summary) => trace.info(format!(
                "Enhancement completed: {} enhanced, {} skipped, {} failed",
                summary.enhanced, summary.skipped, summary.failed
            )),
            Err(e) => trace.error(format!("Enhancement error: {}", e)),
        }
        RunReport { trace, outcome }
    }

    async fn enhance_pending(&self, trace: &mut ExecutionTrace) -> Result<EnhanceSummary> {
        let pending: Vec<Article> = self
            .store
            .list(self.config.enhance_fetch_limit)
            .await?
            .into_iter()
            .filter(Article::is_pending)
            .collect();
        trace.info(format!("Found {} articles to enhance.", pending.len()));

        let mut summary = EnhanceSummary {
            pending: pending.len(),
            ..Default::default()
        };
        if pending.is_empty() {
            return Ok(summary);
        }

        let mut session = self.browser.launch().await?;
        for article in &pending {
            trace.push_prefix(format!("[article {}]", article.id));
            let outcome = self.enhance_one(session.as_mut(), article, trace).await;
            summary.record(&outcome);
            trace.pop_prefix();
        }
        if let Err(e) = session.close().await {
            trace.warn(format!("Failed to close browser session: {}", e));
        }
        Ok(summary)
    }

    /// research, rewrite, persist. Nothing is written unless all three succeed.
    pub async fn enhance_one(
        &self,
        session: &mut dyn BrowserSession,
        article: &Article,
        trace: &mut ExecutionTrace,
    ) -> EnhancementOutcome {
        trace.info(format!("Processing: {}", article.title));

        let references = self.researcher.research(session, &article.title, trace).await;
        if references.is_empty() {
            trace.warn("No references found, skipping.");
            return EnhancementOutcome::Skipped;
        }

        let content = match self.rewriter.rewrite(article.rewrite_source(), &references).await {
            Ok(content) => content,
            Err(e) => {
                trace.error(format!("Rewrite failed: {}", e));
                return EnhancementOutcome::Failed(e.to_string());
            }
        };

        let urls: Vec<String> = references.into_iter().map(|r| r.url).collect();
        let update = ArticleUpdate {
            updated_content: content,
            references: urls.clone(),
        };
        match self.store.update(article.id, update).await {
            Ok(_) => {
                trace.info("Successfully updated article.");
                EnhancementOutcome::Enhanced { references: urls }
            }
            Err(e) => {
                trace.error(format!("Failed to save enhancement: {}", e));
                EnhancementOutcome::Failed(e.to_string())
            }
        }
    }
}
