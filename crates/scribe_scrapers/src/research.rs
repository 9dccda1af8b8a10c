use std::collections::HashSet;
use std::time::Duration;

use scraper::Html;
use scribe_core::{BrowserSession, Error, ExecutionTrace, Page, Reference, Result};
use url::form_urlencoded;
use url::Url;

use crate::scrapers::utils;
use crate::selectors::{SelectorChain, REFERENCE_HEADINGS, REFERENCE_PARAGRAPHS, SEARCH_RESULTS};

/// Query parameters search engines use to wrap outbound result links.
const REDIRECT_PARAMS: &[&str] = &["q", "url", "uddg"];

#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Search page template; `{query}` is replaced by the encoded title.
    pub search_url: String,
    pub blocked_domains: Vec<String>,
    pub max_references: usize,
    pub char_limit: usize,
    pub timeout: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search?q={query}".to_string(),
            blocked_domains: [
                "google.com",
                "youtube.com",
                "facebook.com",
                "reddit.com",
                "quora.com",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            max_references: 2,
            char_limit: 5000,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Finds pages on other sites covering the same topic, to ground a rewrite.
#[derive(Debug, Clone)]
pub struct ReferenceResearcher {
    config: ResearchConfig,
    blocked: Vec<String>,
}

impl ReferenceResearcher {
    pub fn new(config: ResearchConfig) -> Self {
        let mut blocked: Vec<String> = config
            .blocked_domains
            .iter()
            .map(|d| d.trim().trim_start_matches("www.").to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        // The search engine never counts as a reference.
        if let Some(host) = search_host(&config.search_url) {
            if !blocked.contains(&host) {
                blocked.push(host);
            }
        }
        Self { config, blocked }
    }

    pub fn search_url(&self, title: &str) -> Result<Url> {
        let query = form_urlencoded::byte_serialize(title.as_bytes()).collect::<String>();
        Ok(Url::parse(&self.config.search_url.replace("{query}", &query))?)
    }

    /// Outbound result links in page order, with engine redirect wrappers removed.
    pub fn result_links(page: &Page) -> Vec<Url> {
        let document = Html::parse_document(&page.html);
        SEARCH_RESULTS
            .select(&document)
            .into_iter()
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| page.resolve(href))
            .map(|link| unwrap_redirect(link, page.url.host_str()))
            .collect()
    }

    fn is_blocked_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.blocked
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }

    /// HTTP(S), not on a blocked domain, not a PDF.
    pub fn is_candidate(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        !self.is_blocked_host(host) && !url.path().to_lowercase().ends_with(".pdf")
    }

    /// First link of each newly seen host, stopping at `max_references` hosts.
    pub fn select_targets(&self, links: Vec<Url>) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for url in links.into_iter().filter(|u| self.is_candidate(u)) {
            if targets.len() >= self.config.max_references {
                break;
            }
            let Some(host) = url.host_str().map(str::to_lowercase) else {
                continue;
            };
            if seen.insert(host) {
                targets.push(url);
            }
        }
        targets
    }

    /// Heading and paragraph text in labeled sections, cut to `char_limit` characters.
    pub fn summarize(html: &str, char_limit: usize) -> String {
        let document = Html::parse_document(html);
        let collect = |chain: &SelectorChain| {
            chain
                .select(&document)
                .into_iter()
                .filter_map(utils::clean_text)
                .collect::<Vec<_>>()
                .join("\n")
        };
        let headings = collect(&*REFERENCE_HEADINGS);
        let paragraphs = collect(&*REFERENCE_PARAGRAPHS);
        format!("HEADINGS:\n{}\n\nCONTENT:\n{}", headings, paragraphs)
            .chars()
            .take(char_limit)
            .collect()
    }

    async fn search(&self, session: &mut dyn BrowserSession, title: &str) -> Result<Vec<Url>> {
        let url = self.search_url(title)?;
        let page = session.goto(url.as_str()).await?;
        Ok(Self::result_links(&page))
    }

    async fn fetch_reference(
        &self,
        session: &mut dyn BrowserSession,
        url: &Url,
    ) -> Result<Reference> {
        let page = tokio::time::timeout(self.config.timeout, session.goto(url.as_str()))
            .await
            .map_err(|_| Error::Timeout(format!("navigation exceeded {:?}", self.config.timeout)))?
            .map_err(|e| Error::ReferenceFetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Reference {
            url: url.to_string(),
            content: Self::summarize(&page.html, self.config.char_limit),
        })
    }

    /// Up to `max_references` references for `title`. Returns an empty list when the
    /// search fails or nothing usable comes back; individual fetch failures are dropped.
    pub async fn research(
        &self,
        session: &mut dyn BrowserSession,
        title: &str,
        trace: &mut ExecutionTrace,
    ) -> Vec<Reference> {
        trace.info(format!("Searching for: \"{}\"", title));
        let links = match self.search(session, title).await {
            Ok(links) => links,
            Err(e) => {
                trace.error(format!("Search failed: {}", e));
                return Vec::new();
            }
        };

        let targets = self.select_targets(links);
        trace.info(format!(
            "Selected reference URLs: [{}]",
            targets.iter().map(Url::as_str).collect::<Vec<_>>().join(", ")
        ));

        let mut references = Vec::with_capacity(targets.len());
        for url in &targets {
            trace.debug(format!("Scraping reference: {}", url));
            match self.fetch_reference(session, url).await {
                Ok(reference) => references.push(reference),
                Err(e) => trace.error(format!("Failed to scrape {}: {}", url, e)),
            }
        }
        references
    }
}

fn search_host(template: &str) -> Option<String> {
    Url::parse(&template.replace("{query}", ""))
        .ok()?
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())
}

/// Only links served by the results page's own host are treated as engine redirects.
fn unwrap_redirect(url: Url, engine_host: Option<&str>) -> Url {
    let is_wrapper = url.host_str().is_some()
        && url.host_str() == engine_host
        && (url.path() == "/url" || url.path().starts_with("/l/"));
    if !is_wrapper {
        return url;
    }
    let target = url
        .query_pairs()
        .filter(|(key, _)| REDIRECT_PARAMS.contains(&key.as_ref()))
        .filter_map(|(_, value)| Url::parse(&value).ok())
        .find(|target| matches!(target.scheme(), "http" | "https"));
    target.unwrap_or(url)
}
