use std::sync::Arc;

use scribe_core::{CompletionModel, Error, Reference, Result};

pub const REWRITE_INSTRUCTIONS: &str = "Rewrite the given article by improving structure, SEO, and readability.
Follow the tone and formatting style of the reference articles provided below.
Do not copy sentences directly from references.
Produce original, high-quality content.
Add relevant headings and subheadings.";

pub const REFERENCE_MARKER: &str = "--- REFERENCE MATERIAL ---";
pub const ORIGINAL_MARKER: &str = "--- ORIGINAL ARTICLE ---";
pub const OUTPUT_MARKER: &str = "OUTPUT (Markdown):";

/// Rewrites article text through a completion model, using references as style grounding.
#[derive(Clone)]
pub struct ContentRewriter {
    model: Arc<dyn CompletionModel>,
}

impl ContentRewriter {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn build_prompt(original: &str, references: &[Reference]) -> String {
        let reference_context = references
            .iter()
            .enumerate()
            .map(|(i, r)| format!("--- REFERENCE {} ---\n{}", i + 1, r.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n",
            REWRITE_INSTRUCTIONS,
            REFERENCE_MARKER,
            reference_context,
            ORIGINAL_MARKER,
            original,
            OUTPUT_MARKER
        )
    }

    /// One synchronous call to the model. The candidate text is returned as-is.
    pub async fn rewrite(&self, original: &str, references: &[Reference]) -> Result<String> {
        if references.is_empty() {
            return Err(Error::Generative(
                "rewrite needs at least one reference".to_string(),
            ));
        }
        let prompt = Self::build_prompt(original, references);
        tracing::debug!(
            "Sending {} chars to {} with {} references",
            prompt.len(),
            self.model.name(),
            references.len()
        );
        self.model.complete(&prompt).await.map_err(|e| match e {
            Error::Generative(_) => e,
            other => Error::Generative(other.to_string()),
        })
    }
}
