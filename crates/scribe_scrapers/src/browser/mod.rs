use std::sync::Arc;

use scribe_core::{Browser, Error, Result};

pub mod browserless;
pub mod http;

pub use browserless::BrowserlessBrowser;
pub use http::HttpBrowser;

/// `http` fetches raw HTML directly; `browserless` asks a Browserless service for rendered HTML.
pub fn create_browser(
    kind: &str,
    browserless_url: Option<&str>,
    token: Option<&str>,
) -> Result<Arc<dyn Browser>> {
    match kind {
        "http" => Ok(Arc::new(HttpBrowser::new()?)),
        "browserless" => {
            let url = browserless_url.ok_or_else(|| {
                Error::Config("browserless requires --browserless-url".to_string())
            })?;
            Ok(Arc::new(BrowserlessBrowser::new(url, token)?))
        }
        other => Err(Error::Config(format!(
            "Unknown browser: {}. Available: http, browserless",
            other
        ))),
    }
}
