//! In-process browser double: serves canned HTML per URL and counts sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scribe_core::{Browser, BrowserSession, Error, Page, Result};
use url::Url;

#[derive(Default)]
struct Script {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    visits: Vec<String>,
}

#[derive(Clone, Default)]
pub struct ScriptedBrowser {
    script: Arc<Mutex<Script>>,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    fail_launch: bool,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.script.lock().unwrap().delays.insert(url.to_string(), delay);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn set_page(&self, url: &str, html: &str) {
        self.script
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), html.to_string());
    }

    pub fn visits(&self) -> Vec<String> {
        self.script.lock().unwrap().visits.clone()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for ScriptedBrowser {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if self.fail_launch {
            return Err(Error::Browser("cannot start browser".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            browser: self.clone(),
        }))
    }
}

struct ScriptedSession {
    browser: ScriptedBrowser,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<Page> {
        let (html, delay) = {
            let mut script = self.browser.script.lock().unwrap();
            script.visits.push(url.to_string());
            (script.pages.get(url).cloned(), script.delays.get(url).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let html = html.ok_or_else(|| Error::Browser(format!("{} returned 404 Not Found", url)))?;
        Ok(Page {
            url: Url::parse(url)?,
            html,
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.browser.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
