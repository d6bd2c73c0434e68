use crate::core::service::ResearchService;
use crate::core::types::SearchResult;
use crate::export::{self, EXPORT_FILE_NAME, NOTHING_TO_EXPORT_MESSAGE};
use crate::session::{Session, SessionState, Submission};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

pub const BUSY_MESSAGE: &str = "A search is already in progress.";

#[derive(Clone)]
pub struct AppState {
    service: ResearchService,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(service: ResearchService) -> Self {
        Self {
            service,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    state: SessionState,
    has_searched: bool,
    error: Option<String>,
    result: Option<SearchResult>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

async fn health() -> &'static str {
    "OK"
}

/// Held while a search runs. If the handler future is dropped first (the client went
/// away), the session is failed so later searches are not turned away forever.
struct InFlight {
    session: Option<Arc<Mutex<Session>>>,
}

impl InFlight {
    fn new(session: Arc<Mutex<Session>>) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn disarm(mut self) {
        self.session = None;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        log::warn!("Search request dropped before completion");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { session.lock().await.abandon() });
            }
            Err(_) => {
                if let Ok(mut locked) = session.try_lock() {
                    locked.abandon();
                }
            }
        }
    }
}

// The session lock is released while the provider call is in flight; a second
// request in that window sees the Loading state and is turned away.
async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResult>, ApiError> {
    let submission = state.session.lock().await.begin(&req.query);

    let query = match submission {
        Ok(Submission::Started(query)) => query,
        Ok(Submission::Busy) => return Err(api_error(StatusCode::CONFLICT, BUSY_MESSAGE)),
        Err(e) => return Err(api_error(StatusCode::BAD_REQUEST, &e.to_string())),
    };

    let guard = InFlight::new(state.session());
    let outcome = state.service.search(query.as_str()).await;
    let response = match &outcome {
        Ok(result) => Ok(Json(result.clone())),
        Err(e) => Err(api_error(StatusCode::BAD_GATEWAY, &e.to_string())),
    };
    state.session.lock().await.finish(outcome);
    guard.disarm();
    response
}

async fn current_state(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(StateResponse {
        state: session.state(),
        has_searched: session.has_searched(),
        error: session.error().map(str::to_string),
        result: session.result().cloned(),
    })
}

async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let data = session
        .result()
        .and_then(export::exportable)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, NOTHING_TO_EXPORT_MESSAGE))?;

    let csv = export::to_csv(data).map_err(|e| {
        log::error!("Failed to build CSV export: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build the export.")
    })?;
    drop(session);

    Ok((
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", post(search))
        .route("/api/state", get(current_state))
        .route("/api/export", get(export_csv))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
