use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use scribe_core::{Article, Browser, Result, RunReport};

use crate::browser::create_browser;
use crate::pipeline::{Pipeline, PipelineConfig, DEFAULT_LISTING_URL};
use crate::research::ResearchConfig;

/// Browsing and pipeline settings shared by every command.
#[derive(Args, Clone)]
pub struct PipelineArgs {
    /// Blog listing root; pagination is discovered from here
    #[arg(long, env = "SCRIBE_LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,
    /// Browsing backend: http or browserless
    #[arg(long, default_value = "http")]
    pub browser: String,
    #[arg(long, env = "BROWSERLESS_URL")]
    pub browserless_url: Option<String>,
    #[arg(long, env = "BROWSERLESS_TOKEN", hide_env_values = true)]
    pub browserless_token: Option<String>,
    /// Articles taken from the last listing page per scrape
    #[arg(long, default_value_t = 5)]
    pub batch_size: usize,
    /// Search page used for reference research; `{query}` is replaced by the title
    #[arg(long, default_value = "https://www.google.com/search?q={query}")]
    pub search_url: String,
    #[arg(long, default_value_t = 2)]
    pub max_references: usize,
    /// Per-reference navigation timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub reference_timeout: u64,
}

impl fmt::Debug for PipelineArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineArgs")
            .field("listing_url", &self.listing_url)
            .field("browser", &self.browser)
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_deref().map(|_| "<redacted>"),
            )
            .field("batch_size", &self.batch_size)
            .field("search_url", &self.search_url)
            .field("max_references", &self.max_references)
            .field("reference_timeout", &self.reference_timeout)
            .finish()
    }
}

impl PipelineArgs {
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            listing_url: self.listing_url.clone(),
            scrape_batch_size: self.batch_size,
            research: ResearchConfig {
                search_url: self.search_url.clone(),
                max_references: self.max_references,
                timeout: Duration::from_secs(self.reference_timeout),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn browser(&self) -> Result<Arc<dyn Browser>> {
        create_browser(
            &self.browser,
            self.browserless_url.as_deref(),
            self.browserless_token.as_deref(),
        )
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Scrape the oldest articles from the listing into the store
    Scrape,
    /// Research and rewrite every pending article
    Enhance,
    /// List stored articles, newest first
    Articles {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

impl ScraperCommands {
    pub fn needs_model(&self) -> bool {
        matches!(self, ScraperCommands::Enhance)
    }
}

/// Runs one command to completion, printing the trace. Errors mean a non-zero exit.
pub async fn handle_command(command: ScraperCommands, pipeline: &Pipeline) -> Result<()> {
    match command {
        ScraperCommands::Scrape => {
            let summary = print_report(pipeline.scrape().await)?;
            println!(
                "Scraped {} of {} articles ({} already stored, {} failed)",
                summary.created, summary.selected, summary.existing, summary.failed
            );
        }
        ScraperCommands::Enhance => {
            let summary = print_report(pipeline.enhance().await)?;
            println!(
                "Enhanced {} of {} pending articles ({} skipped, {} failed)",
                summary.enhanced, summary.pending, summary.skipped, summary.failed
            );
        }
        ScraperCommands::Articles { limit } => {
            let articles = pipeline.store().list(limit).await?;
            println!("Found {} articles", articles.len());
            for article in &articles {
                println!("{}", article_line(article));
            }
        }
    }
    Ok(())
}

fn print_report<S>(report: RunReport<S>) -> Result<S> {
    let rendered = report.trace.render();
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    report.outcome
}

fn article_line(article: &Article) -> String {
    let status = if article.is_updated { "enhanced" } else { "pending" };
    format!("{:>4} [{}] {} - {}", article.id, status, article.title, article.source_url)
}
