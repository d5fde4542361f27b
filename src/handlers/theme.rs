use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::state::AppState;

// GET /api/theme
pub async fn get_theme(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "theme": state.theme.current() }))
}

// POST /api/theme/toggle
pub async fn toggle_theme(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let theme = state.theme.toggle()?;
    tracing::debug!(theme = theme.as_str(), "theme toggled");
    Ok(Json(serde_json::json!({ "theme": theme })))
}
