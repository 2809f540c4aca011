//! Recommendation service — the seam between a session and the text model.
//!
//! `AppState` holds an `Arc<dyn RecommendationService>`. Production uses
//! `GeminiRecommender`; tests plug in a fake that never leaves the process.

use async_trait::async_trait;

use crate::llm_client::{LlmClient, LlmError};

/// Turns a curator prompt into the model's raw reply text.
/// One call per invocation; failures come back as `Err`, never as a panic.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct GeminiRecommender(pub LlmClient);

#[async_trait]
impl RecommendationService for GeminiRecommender {
    async fn recommend(&self, prompt: &str) -> Result<String, LlmError> {
        self.0.call_text(prompt).await
    }
}
