use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    /// Runs one prompt through the generative service and returns its primary text candidate.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
