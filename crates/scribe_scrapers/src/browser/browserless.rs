use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scribe_core::{Browser, BrowserSession, Error, Page, Result};
use url::Url;

/// Renders pages through a Browserless `/content` endpoint, for listings that need JavaScript.
pub struct BrowserlessBrowser {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessBrowser {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Browser(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }
}

#[async_trait]
impl Browser for BrowserlessBrowser {
    fn name(&self) -> &str {
        "browserless"
    }

    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(BrowserlessSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            open: true,
        }))
    }
}

pub struct BrowserlessSession {
    client: Client,
    base_url: String,
    token: Option<String>,
    open: bool,
}

#[async_trait]
impl BrowserSession for BrowserlessSession {
    async fn goto(&mut self, url: &str) -> Result<Page> {
        if !self.open {
            return Err(Error::Browser("session is closed".to_string()));
        }
        let target = Url::parse(url)?;

        let mut request = self
            .client
            .post(format!("{}/content", self.base_url))
            .json(&serde_json::json!({ "url": url }));
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Browser(format!("Browserless request for {} failed: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Browser(format!(
                "Browserless returned {} for {}: {}",
                status, url, message
            )));
        }
        let html = response
            .text()
            .await
            .map_err(|e| Error::Browser(format!("Failed to read {}: {}", url, e)))?;
        Ok(Page { url: target, html })
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
