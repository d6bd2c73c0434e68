use thiserror::Error;

/// Message shown when the query is blank.
pub const VALIDATION_MESSAGE: &str = "Please enter a valid company or query.";

/// Message shown when the search service could not be reached. The underlying cause is
/// logged, never displayed.
pub const REQUEST_FAILED_MESSAGE: &str =
    "Failed to retrieve data. The API might be unavailable or the request failed. Please try again later.";

/// Failures talking to the generative search API.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("no candidates in response")]
    Empty,
}

// Request URLs are stripped so nothing from the query string ends up in logs.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.without_url())
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    #[error("{}", REQUEST_FAILED_MESSAGE)]
    Request(#[source] ProviderError),
}

impl SearchError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation)
    }
}
