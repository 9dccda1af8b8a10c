use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use scribe_core::{CompletionModel, Error, Result};
use serde::{Deserialize, Serialize};

use super::{check_status, service_error};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash";

    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("Gemini API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl CompletionModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| service_error("Gemini request failed", e))?;

        let response = check_status(response)
            .await?
            .json::<GenerateResponse>()
            .await
            .map_err(|e| service_error("Malformed Gemini response", e))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| Error::Generative("Gemini response has no text candidate".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn model_for(server: &MockServer) -> GeminiModel {
        GeminiModel::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(&server.uri())
    }

    #[test]
    fn test_model_requires_api_key() {
        let result = GeminiModel::new(None);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Configuration error: Gemini API key is required"
        );
        assert!(GeminiModel::new(Some("  ".to_string())).is_err());
        assert!(GeminiModel::new(Some("key".to_string())).is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let model = GeminiModel::new(Some("super-secret".to_string())).unwrap();
        assert!(!format!("{:?}", model).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_complete_returns_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "Rewrite this" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "# Heading\n\nBody" }] } },
                    { "content": { "parts": [{ "text": "second" }] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = model_for(&server).await;
        let text = model.complete("Rewrite this").await.unwrap();
        assert_eq!(text, "# Heading\n\nBody");
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let err = model_for(&server).await.complete("x").await.unwrap_err();
        assert!(matches!(err, Error::Generative(_)));
    }

    #[tokio::test]
    async fn test_complete_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = model_for(&server).await.complete("x").await.unwrap_err();
        match err {
            Error::Generative(message) => assert!(message.contains("quota exceeded")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_transport_failure() {
        let model = GeminiModel::new(Some("k".to_string()))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = model.complete("x").await.unwrap_err();
        assert!(matches!(err, Error::Generative(_)));
    }
}
