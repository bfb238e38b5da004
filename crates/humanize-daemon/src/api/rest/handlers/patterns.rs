//! Style analysis handler

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use humanize_types::{HumanizationRequest, StyleProfile};
use serde::Serialize;

/// Analyze patterns response
#[derive(Debug, Serialize)]
pub struct PatternsResponse {
    pub patterns: StyleProfile,
}

/// Derive a style profile from the request text
pub async fn analyze_patterns(
    State(state): State<AppState>,
    Json(request): Json<HumanizationRequest>,
) -> ApiResult<Json<PatternsResponse>> {
    let patterns = state.humanizer.analyze_patterns(&request.text).await?;
    Ok(Json(PatternsResponse { patterns }))
}
