use std::fmt;

use async_trait::async_trait;
use scribe_core::{CompletionModel, Result};

use crate::rewriter::{ORIGINAL_MARKER, OUTPUT_MARKER};

/// Offline model for dry runs: echoes the original article back as markdown.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let original = prompt
            .split_once(ORIGINAL_MARKER)
            .map(|(_, rest)| rest)
            .unwrap_or(prompt);
        let original = original
            .split_once(OUTPUT_MARKER)
            .map(|(body, _)| body)
            .unwrap_or(original)
            .trim();

        // Take first 20 words as the lede
        let lede = original.split_whitespace().take(20).collect::<Vec<_>>().join(" ");
        Ok(format!("# Overview\n\n{}\n\n## Details\n\n{}", lede, original))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewriter::ContentRewriter;
    use scribe_core::Reference;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let references = vec![Reference {
            url: "https://ref.test/a".to_string(),
            content: "HEADINGS:\nRef".to_string(),
        }];
        let prompt = ContentRewriter::build_prompt("Chatbots help support teams.", &references);

        let output = model.complete(&prompt).await.unwrap();
        assert!(output.starts_with("# Overview"));
        assert!(output.contains("Chatbots help support teams."));
        assert!(!output.contains("REFERENCE"));
    }
}
