use super::error::SearchError;
use super::types::{SearchResult, Source};
use crate::parse;
use crate::prompt;
use crate::provider::SearchProvider;
use crate::query::Query;
use std::sync::Arc;

/// Runs one research query end to end: prompt, provider call, parse.
#[derive(Clone)]
pub struct ResearchService {
    provider: Arc<dyn SearchProvider>,
}

impl ResearchService {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Blank input is rejected before anything goes over the network. Provider failures
    /// are logged and surface as [`SearchError::Request`]; a response whose structured
    /// block does not decode still succeeds with a summary-only result.
    pub async fn search(&self, input: &str) -> Result<SearchResult, SearchError> {
        let query = Query::new(input)?;
        let prompt = prompt::build(&query);

        log::debug!("Searching for: {}", query);
        let response = self.provider.generate(&prompt).await.map_err(|e| {
            log::error!("Error calling the search provider: {}", e);
            SearchError::Request(e)
        })?;

        let sources: Vec<Source> = response
            .grounding_chunks
            .iter()
            .filter_map(|chunk| Source::from_chunk(&chunk.title, &chunk.uri))
            .collect();

        let (summary, financial_data, news_sentiment) = parse::parse(&response.text).into_parts();
        log::debug!(
            "Parsed response: {} sources, financial data: {}, sentiment: {}",
            sources.len(),
            financial_data.is_some(),
            news_sentiment.is_some()
        );

        Ok(SearchResult {
            summary,
            sources,
            financial_data,
            news_sentiment,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::error::ProviderError;
    use crate::parse::PARSE_FAILURE_NOTE;
    use crate::prompt::{JSON_DELIMITER_END, JSON_DELIMITER_START};
    use crate::provider::{GroundingChunk, ProviderResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a canned answer and records every prompt it receives.
    pub(crate) struct StubProvider {
        pub reply: Option<ProviderResponse>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        pub fn answering(text: &str, chunks: Vec<GroundingChunk>) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(ProviderResponse {
                    text: text.to_string(),
                    grounding_chunks: chunks,
                }),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| ProviderError::Api("quota exceeded".to_string()))
        }
    }

    fn chunk(title: &str, uri: &str) -> GroundingChunk {
        GroundingChunk {
            title: title.to_string(),
            uri: uri.to_string(),
        }
    }

    #[tokio::test]
    async fn blank_query_never_reaches_provider() {
        let stub = StubProvider::answering("unused", vec![]);
        let service = ResearchService::new(stub.clone());

        let err = service.search("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn builds_result_from_provider_answer() {
        let text = format!(
            "Fan Milk had a tough year.\n{}{{\"newsSentiment\":{{\"summary\":\"Weak\",\"score\":\"Negative\"}}}}{}",
            JSON_DELIMITER_START, JSON_DELIMITER_END
        );
        let stub = StubProvider::answering(
            &text,
            vec![
                chunk("Fan Milk PLC", "https://fanmilk.com"),
                chunk("", "https://untitled.example"),
                chunk("No link", ""),
            ],
        );
        let service = ResearchService::new(stub.clone());

        let result = service.search(" Fan Milk PLC ").await.unwrap();
        assert_eq!(result.summary, "Fan Milk had a tough year.");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].title, "Fan Milk PLC");
        assert!(result.financial_data.is_none());
        assert_eq!(result.news_sentiment.unwrap().summary, "Weak");

        assert_eq!(stub.call_count(), 1);
        assert!(stub.prompts.lock().unwrap()[0].contains("\"Fan Milk PLC\""));
    }

    #[tokio::test]
    async fn malformed_block_degrades_instead_of_failing() {
        let text = format!("Summary{}{{oops{}", JSON_DELIMITER_START, JSON_DELIMITER_END);
        let service = ResearchService::new(StubProvider::answering(&text, vec![]));

        let result = service.search("GCB Bank").await.unwrap();
        assert_eq!(result.summary, format!("Summary{}", PARSE_FAILURE_NOTE));
        assert!(result.financial_data.is_none());
    }

    #[tokio::test]
    async fn provider_failure_is_a_request_error() {
        let service = ResearchService::new(StubProvider::failing());
        let err = service.search("Tullow Oil").await.unwrap_err();
        assert!(matches!(err, SearchError::Request(ProviderError::Api(_))));
    }
}
