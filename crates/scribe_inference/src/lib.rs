use std::fmt;

pub mod models;
pub mod rewriter;

/// Selects and configures the generative-completion backend.
#[derive(Clone)]
pub struct Config {
    /// `gemini`, `deepseek` or `dummy`.
    pub model: String,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini".to_string(),
            api_key: None,
            model_name: None,
            base_url: None,
        }
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::rewriter::ContentRewriter;
    pub use super::Config;
    pub use scribe_core::{CompletionModel, Error, Reference, Result};
}

pub use models::create_model;
pub use rewriter::ContentRewriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
