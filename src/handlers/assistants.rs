use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::{page, Page};
use crate::errors::AppError;
use crate::models::{
    Assistant, AssistantId, AssistantStatus, AssistantUpdate, AvailableDays, CreateAssistantForm,
    KnowledgeDocument, WallTime,
};
use crate::services::assistants::{self, CreatedAssistant, DashboardView};
use crate::services::slots::{self, SlotPreview};
use crate::state::AppState;

// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page<DashboardView>>, AppError> {
    let session = state.session.require_user()?;
    let view = assistants::load_dashboard(&state, &session).await;
    Ok(page(&state, "dashboard", view))
}

// PATCH /dashboard/assistants/:id
pub async fn update_assistant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AssistantId>,
    Json(body): Json<AssistantUpdate>,
) -> Result<Json<Page<Vec<Assistant>>>, AppError> {
    let session = state.session.require_user()?;
    let list = assistants::update(&state, &session, id, body).await?;
    Ok(page(&state, "dashboard", list))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: Option<AssistantStatus>,
}

// POST /dashboard/assistants/:id/status
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AssistantId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Assistant>, AppError> {
    state.session.require_user()?;

    let current = state
        .assistants
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("assistant {id}")))?;
    let status = body.status.unwrap_or_else(|| current.status.toggled());

    state
        .assistants
        .set_status(id, status)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("assistant {id}")))
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub slot_duration: Option<u32>,
    pub available_days: Option<String>,
}

// GET /create/preview
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Page<SlotPreview>>, AppError> {
    state.session.require_user()?;

    let time = |raw: Option<&str>, default: &str| {
        WallTime::parse(raw.unwrap_or(default)).map_err(AppError::Validation)
    };
    let start = time(query.start_time.as_deref(), "09:00")?;
    let end = time(query.end_time.as_deref(), "17:00")?;
    let days = match query.available_days {
        Some(raw) => serde_json::from_value(serde_json::Value::String(raw))
            .map_err(|e| AppError::Validation(e.to_string()))?,
        None => AvailableDays::default(),
    };

    let preview = slots::preview(start, end, query.slot_duration.unwrap_or(30), &days)?;
    Ok(page(&state, "create", preview))
}

async fn read_form(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<KnowledgeDocument>), AppError> {
    let mut fields = HashMap::new();
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "files" || name == "files[]" {
            let file_name = field.file_name().unwrap_or("document").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            // browsers send an empty part when no file was picked
            if bytes.is_empty() {
                continue;
            }
            documents.push(KnowledgeDocument {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, documents))
}

// POST /create
pub async fn create_assistant(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CreatedAssistant>, AppError> {
    let session = state.session.require_user()?;

    let (fields, documents) = read_form(multipart).await?;
    let form = match CreateAssistantForm::from_fields(&fields) {
        Ok(form) => form,
        Err(e) => {
            state.notifier.error("create", &e);
            return Err(e);
        }
    };

    let created = assistants::create(&state, &session, form, documents).await?;
    Ok(Json(created))
}
