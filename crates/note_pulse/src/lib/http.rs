//! Thin, stateless HTTP adapter over the notes pipeline.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::Error, llm::NoteSection, llm::NotesSynthesizer, pipeline::NotesPipeline,
    yt::TranscriptFetcher,
};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub notes: Vec<NoteSection>,
    pub link: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::LinkNotProvided => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::TranscriptFailed { .. } | Error::NotesFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            // pool construction happens at startup; reaching this from a
            // request would be a bug
            Error::EmptyKeyPool => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Builds the service router around a shared pipeline.
pub fn create_router<T, S>(pipeline: Arc<NotesPipeline<T, S>>) -> Router
where
    T: TranscriptFetcher + Send + Sync + 'static,
    S: NotesSynthesizer + Send + Sync + 'static,
{
    // the original frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate::<T, S>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn health() -> &'static str {
    "ok"
}

async fn generate<T, S>(
    State(pipeline): State<Arc<NotesPipeline<T, S>>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, Error>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    S: NotesSynthesizer + Send + Sync + 'static,
{
    let link = request.link.unwrap_or_default();
    let notes = pipeline.handle(&link).await?;

    Ok(Json(GenerateResponse {
        message: "Successful".to_string(),
        notes,
        link,
    }))
}
