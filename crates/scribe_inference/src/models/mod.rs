use std::sync::Arc;

use scribe_core::{CompletionModel, Error, Result};

use crate::Config;

pub mod deepseek;
pub mod dummy;
pub mod gemini;

pub use deepseek::DeepSeekModel;
pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Turns a transport or decoding failure into the per-article service failure.
pub(crate) fn service_error(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Generative(format!("{}: {}", context, err))
}

pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Generative(format!("service returned {}: {}", status, body.trim())))
}

pub fn create_model(config: &Config) -> Result<Arc<dyn CompletionModel>> {
    let model: Arc<dyn CompletionModel> = match config.model.as_str() {
        "gemini" => {
            let mut model = GeminiModel::new(config.api_key.clone())?;
            if let Some(name) = &config.model_name {
                model = model.with_model(name);
            }
            if let Some(url) = &config.base_url {
                model = model.with_base_url(url);
            }
            Arc::new(model)
        }
        "deepseek" => {
            let mut model = DeepSeekModel::new(config.api_key.clone())?;
            if let Some(name) = &config.model_name {
                model = model.with_model(name);
            }
            if let Some(url) = &config.base_url {
                model = model.with_base_url(url);
            }
            Arc::new(model)
        }
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown model: {}. Available models: gemini (default), deepseek, dummy",
                other
            )))
        }
    };
    tracing::debug!("Created completion model {}", model.name());
    Ok(model)
}
