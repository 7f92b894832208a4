use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use nd_core::{ProcessedArticle, RawArticle};
use nd_ingest::IngestReport;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;
use crate::AppState;

pub const DEFAULT_NEWS_LIMIT: usize = 50;

/// Wraps core errors so handlers can use `?`.
#[derive(Debug)]
pub struct ApiError(nd_core::Error);

impl From<nd_core::Error> for ApiError {
    fn from(err: nd_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<usize>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "News NLP backend is live." }))
}

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(items): Json<Vec<RawArticle>>,
) -> Result<(StatusCode, Json<IngestReport>), ApiError> {
    let outcome = state.pipeline.ingest(items).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome.report)))
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<ProcessedArticle>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_NEWS_LIMIT);
    Ok(Json(state.storage.list(Some(limit)).await?))
}
