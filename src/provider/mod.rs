pub mod gemini;

pub use gemini::GeminiProvider;

use crate::core::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A citation returned alongside a grounded answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// Raw answer from the generative search service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// The outbound boundary: one prompt in, one web-grounded answer out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;
}
