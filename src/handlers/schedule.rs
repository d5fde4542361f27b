use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::{page, Page};
use crate::errors::AppError;
use crate::models::AssistantId;
use crate::services::assistants;
use crate::services::schedule::{self, ScheduleView, ViewMode};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub assistant_id: Option<AssistantId>,
    pub date: Option<NaiveDate>,
    pub view: Option<ViewMode>,
}

// GET /schedule
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Page<ScheduleView>>, AppError> {
    let session = state.session.require_user()?;

    let assistant_id = match query.assistant_id.or_else(|| state.assistants.first_id()) {
        Some(id) => id,
        None => assistants::refresh(&state, session.id)
            .await?
            .first()
            .map(|a| a.id)
            .ok_or_else(|| AppError::NotFound("no assistants to show a schedule for".to_string()))?,
    };
    let anchor = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let mode = query.view.unwrap_or_default();

    tracing::info!(assistant_id, %anchor, view = ?mode, "loading schedule");

    let view = schedule::load_schedule(&state, assistant_id, mode, anchor).await?;
    Ok(page(&state, "schedule", view))
}

// GET /schedule/current
pub async fn current_schedule(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page<ScheduleView>>, AppError> {
    state.session.require_user()?;
    let view = state
        .schedule
        .latest()
        .ok_or_else(|| AppError::NotFound("no schedule loaded".to_string()))?;
    Ok(page(&state, "schedule", view))
}

// DELETE /schedule/view
pub async fn close_view(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.session.require_user()?;
    state.schedule.teardown();
    Ok(Json(serde_json::json!({ "ok": true })))
}
