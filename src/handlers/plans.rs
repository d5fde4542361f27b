use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::{page, Page};
use crate::errors::AppError;
use crate::models::plan::{self, Plan};
use crate::state::AppState;

#[derive(Serialize)]
pub struct Landing {
    headline: &'static str,
    tagline: &'static str,
    signed_in: bool,
    call_to_action: &'static str,
    plans: Vec<Plan>,
}

// GET /
pub async fn landing(State(state): State<Arc<AppState>>) -> Json<Page<Landing>> {
    let signed_in = state.session.require_user().is_ok();
    let landing = Landing {
        headline: "Your AI receptionist, always on the line",
        tagline: "A voice assistant that answers calls and books appointments into your schedule.",
        signed_in,
        call_to_action: if signed_in { "/create" } else { "/login" },
        plans: plan::catalog(),
    };
    page(&state, "home", landing)
}

// GET /plans
pub async fn list_plans(State(state): State<Arc<AppState>>) -> Json<Page<Vec<Plan>>> {
    page(&state, "plans", plan::catalog())
}

// POST /plans/:id/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = state.session.require_user()?;
    let plan = plan::find(&id).ok_or_else(|| AppError::NotFound(format!("plan {id}")))?;

    // Payments are not processed; the request is acknowledged only.
    let message = if plan.id == "custom" {
        "Thanks! We'll reach out to schedule a consultation.".to_string()
    } else {
        format!("Subscribed to the {} plan at {} per month", plan.name, plan.price)
    };
    tracing::info!(user_id = session.id, plan = plan.id, "subscription requested");
    state.notifier.success("plans", &message);

    Ok(Json(serde_json::json!({
        "ok": true,
        "plan": plan.id,
        "message": message,
        "redirect": "/dashboard",
    })))
}
