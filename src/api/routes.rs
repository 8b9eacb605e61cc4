//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, error};

use crate::{api::types::AnalyzeRequest, nlp::AnalysisResult};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalysisResult> {
    debug!(bytes = request.text.len(), "analysing snippet");
    let analyzer = state.analyzer.clone();
    tokio::task::spawn_blocking(move || analyzer.analyze(&request.text))
        .await
        .map(Json)
        .map_err(|err| {
            error!(%err, "analysis task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })
}
