pub mod browser;
pub mod cli;
pub mod logging;
pub mod pipeline;
pub mod research;
pub mod scrapers;
pub mod selectors;

#[cfg(test)]
mod test_utils;

pub use browser::create_browser;
pub use cli::{handle_command, PipelineArgs, ScraperCommands};
pub use logging::init_logging;
pub use pipeline::{
    EnhanceSummary, EnhancementOrchestrator, EnhancementOutcome, Pipeline, PipelineConfig,
    ScrapeOrchestrator, ScrapeSummary,
};
pub use research::{ReferenceResearcher, ResearchConfig};
pub use scrapers::{ArticleLister, ContentExtractor, PageDiscovery};

pub mod prelude {
    pub use super::pipeline::{Pipeline, PipelineConfig};
    pub use super::scrapers::{ArticleLister, ContentExtractor, PageDiscovery};
    pub use scribe_core::{Article, Error, Result};
}
