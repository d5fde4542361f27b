use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{page, Page};
use crate::errors::AppError;
use crate::services::session::{login_redirect_url, SessionState};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LoginView {
    login_url: String,
}

// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page<LoginView>>, AppError> {
    let login_url = login_redirect_url(&state.config.auth_base_url, &state.config.public_url)?;
    Ok(page(&state, "login", LoginView { login_url }))
}

// GET /auth/login
pub async fn start_login(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let url = login_redirect_url(&state.config.auth_base_url, &state.config.public_url)?;
    Ok(Redirect::to(&url))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub login: Option<String>,
}

// GET /auth/callback
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if query.login.as_deref() != Some("success") {
        tracing::warn!(login = ?query.login, "login was not successful");
        state
            .notifier
            .error("login", &"login was not successful".to_string());
        return Redirect::to("/login");
    }

    match state
        .session
        .complete_login(state.backend.as_ref(), Utc::now())
        .await
    {
        Ok(session) => {
            state
                .notifier
                .success("login", &format!("Signed in as {}", session.name));
            Redirect::to("/create")
        }
        Err(e) => {
            state.notifier.error("login", &e);
            Redirect::to("/login")
        }
    }
}

// POST /auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, AppError> {
    state.session.logout()?;
    tracing::info!("signed out");
    Ok(Json(serde_json::json!({ "ok": true, "redirect": "/" })))
}

// GET /api/session
pub async fn session_status(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.session.current())
}
