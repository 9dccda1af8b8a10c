use async_trait::async_trait;
use url::Url;

use crate::Result;

/// A loaded document. `url` is where navigation ended up and is the base for relative links.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub html: String,
}

impl Page {
    /// Resolves an `href` the way a browser resolves `anchor.href`.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href.trim()).ok()
    }
}

#[async_trait]
pub trait Browser: Send + Sync {
    fn name(&self) -> &str;

    /// Opens a session. Failing here is fatal to a run.
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<Page>;

    /// Releases the session. Must be safe to call more than once.
    async fn close(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let page = Page {
            url: Url::parse("https://blog.test/blogs/page/3/").unwrap(),
            html: String::new(),
        };
        assert_eq!(
            page.resolve("/blogs/post-a/").unwrap().as_str(),
            "https://blog.test/blogs/post-a/"
        );
        assert_eq!(
            page.resolve("post-b").unwrap().as_str(),
            "https://blog.test/blogs/page/3/post-b"
        );
        assert_eq!(
            page.resolve("https://other.test/x").unwrap().as_str(),
            "https://other.test/x"
        );
    }
}
