use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{ContextOverride, Preferences, RecommendationSet},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub preferences: Preferences,
    /// Optional partial override of the configured default context
    #[serde(default)]
    pub context: Option<ContextOverride>,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Run the recommendation pipeline for one request
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationSet>> {
    let mut ctx = state.default_context.clone();
    ctx.local_time_iso = chrono::Local::now().to_rfc3339();
    if let Some(over) = request.context {
        ctx = ctx.with_override(over);
    }

    let set = state.pipeline.run(&request.preferences, &ctx).await?;
    Ok(Json(set))
}
