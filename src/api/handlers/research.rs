use crate::{
    AppState,
    research::NoopObserver,
    types::{AppError, ErrorResponse, ResearchRequest, ResearchResponse, Result},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::time::Instant;
use tracing::debug;

const INVALID_QUERY: &str = "Please provide a valid research question";

/// Run the research pipeline for a single question
#[utoipa::path(
    post,
    path = "/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchResponse),
        (status = 400, description = "Missing or blank query", body = ErrorResponse),
        (status = 500, description = "Research run failed", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchResponse>> {
    let query = match payload {
        Ok(Json(request)) => validate_query(request.query)?,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected research request body");
            return Err(AppError::InvalidInput(INVALID_QUERY.to_string()));
        }
    };

    let start = Instant::now();
    let run = state.coordinator.run(&query, &NoopObserver).await?;

    Ok(Json(ResearchResponse {
        success: true,
        report: run.report,
        timestamp: run.completed_at,
        run_id: run.run_id,
        duration_ms: start.elapsed().as_millis() as u64,
    }))
}

fn validate_query(query: Option<String>) -> Result<String> {
    query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput(INVALID_QUERY.to_string()))
}
