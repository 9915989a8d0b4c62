//! Seams to the three hosted services. Implementations live in `infrastructure`.

use crate::message::Message;
use crate::models::RetrievalMatch;
use async_trait::async_trait;
use shared::types::Result;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns at most `top_k` matches, best first.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String>;
}
