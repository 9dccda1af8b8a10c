use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scribe_core::{Browser, BrowserSession, Error, Page, Result};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; scribe/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Plain HTTP "browser": no JavaScript, just the served HTML.
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(60))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Browser(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    fn name(&self) -> &str {
        "http"
    }

    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            open: true,
        }))
    }
}

pub struct HttpSession {
    client: Client,
    open: bool,
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn goto(&mut self, url: &str) -> Result<Page> {
        if !self.open {
            return Err(Error::Browser("session is closed".to_string()));
        }
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Browser(format!("Failed to load {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Browser(format!("{} returned {}", url, status)));
        }
        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| Error::Browser(format!("Failed to read {}: {}", url, e)))?;
        Ok(Page { url: final_url, html })
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
