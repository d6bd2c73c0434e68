use super::config::ResearchConfig;
use super::service::ResearchService;
use crate::provider::GeminiProvider;
use anyhow::Result;
use std::sync::Arc;

/// Builds the research service backed by Gemini.
pub fn initialize_service(config: &ResearchConfig) -> Result<ResearchService> {
    log::debug!("Initializing Gemini provider with model {}", config.model);
    let provider = GeminiProvider::new(config)?;
    Ok(ResearchService::new(Arc::new(provider)))
}
