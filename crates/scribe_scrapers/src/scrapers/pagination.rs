use scraper::Html;
use scribe_core::{BrowserSession, Error, ExecutionTrace, Page, Result};
use url::Url;

use crate::scrapers::utils;
use crate::selectors::PAGINATION_LINKS;

/// Finds the last page of the paginated blog listing.
#[derive(Debug, Clone)]
pub struct PageDiscovery {
    root_url: String,
}

impl PageDiscovery {
    pub fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
        }
    }

    /// Link of the last numbered pagination anchor, in document order.
    ///
    /// Source order is assumed ascending, so the numbers are not compared. Returns
    /// `None` when the listing has no numbered pagination.
    pub fn find_last_page(page: &Page) -> Option<Url> {
        let document = Html::parse_document(&page.html);
        PAGINATION_LINKS
            .select(&document)
            .into_iter()
            .filter(|anchor| {
                utils::clean_text(*anchor)
                    .map(|text| text.parse::<u64>().is_ok())
                    .unwrap_or(false)
            })
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| page.resolve(href))
            .last()
    }

    /// Loads the listing root and moves to its last page. Any navigation failure
    /// here ends the run.
    pub async fn discover(
        &self,
        session: &mut dyn BrowserSession,
        trace: &mut ExecutionTrace,
    ) -> Result<Page> {
        let root = session.goto(&self.root_url).await.map_err(|e| {
            Error::Discovery(format!("Cannot load listing {}: {}", self.root_url, e))
        })?;

        match Self::find_last_page(&root) {
            Some(last) if last != root.url => {
                trace.info(format!("Navigating to last page: {}", last));
                session
                    .goto(last.as_str())
                    .await
                    .map_err(|e| Error::Discovery(format!("Cannot load last page {}: {}", last, e)))
            }
            Some(_) => {
                trace.info("Listing root is already the last page");
                Ok(root)
            }
            None => {
                trace.info("No pagination found, assuming single page.");
                Ok(root)
            }
        }
    }
}
