use crate::core::error::{SearchError, REQUEST_FAILED_MESSAGE, VALIDATION_MESSAGE};
use crate::core::service::ResearchService;
use crate::core::types::SearchResult;
use crate::query::Query;
use crate::render::View;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Started(Query),
    /// A search is already in flight; nothing was done.
    Busy,
}

/// The interaction shell's state: at most one search in flight and a single slot for
/// the latest result.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    result: Option<SearchResult>,
    error: Option<String>,
    has_searched: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            result: None,
            error: None,
            has_searched: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Starts a search for `input`. Blank input records the validation message and
    /// leaves the state as it was.
    pub fn begin(&mut self, input: &str) -> Result<Submission, SearchError> {
        if self.is_loading() {
            log::debug!("Ignoring submit while a search is in flight");
            return Ok(Submission::Busy);
        }

        let query = match Query::new(input) {
            Ok(query) => query,
            Err(e) => {
                self.error = Some(VALIDATION_MESSAGE.to_string());
                return Err(e);
            }
        };

        self.state = SessionState::Loading;
        self.result = None;
        self.error = None;
        self.has_searched = true;
        Ok(Submission::Started(query))
    }

    /// Records the outcome of the search started by [`Session::begin`].
    pub fn finish(&mut self, outcome: Result<SearchResult, SearchError>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.state = SessionState::Success;
            }
            Err(e) => {
                log::error!("Search failed: {:?}", e);
                self.result = None;
                self.error = Some(REQUEST_FAILED_MESSAGE.to_string());
                self.state = SessionState::Failure;
            }
        }
    }

    /// Fails a search whose caller went away before [`Session::finish`] could run.
    pub fn abandon(&mut self) {
        if self.is_loading() {
            log::warn!("Search abandoned before it finished");
            self.result = None;
            self.error = Some(REQUEST_FAILED_MESSAGE.to_string());
            self.state = SessionState::Failure;
        }
    }

    /// Runs a full submit → search → finish cycle.
    pub async fn search(
        &mut self,
        service: &ResearchService,
        input: &str,
    ) -> Result<Submission, SearchError> {
        let submission = self.begin(input)?;
        if let Submission::Started(query) = &submission {
            let outcome = service.search(query.as_str()).await;
            self.finish(outcome);
        }
        Ok(submission)
    }

    /// Drops the current result and error, back to the welcome screen.
    pub fn reset(&mut self) {
        if !self.is_loading() {
            *self = Session::new();
        }
    }

    pub fn view(&self) -> View<'_> {
        View::select(self.is_loading(), self.result.as_ref(), self.has_searched)
    }
}
