pub mod assistants;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod plans;
pub mod schedule;
pub mod theme;

use axum::Json;
use serde::Serialize;

use crate::models::Theme;
use crate::state::AppState;

/// Envelope every view is rendered in.
#[derive(Serialize)]
pub struct Page<T> {
    pub view: &'static str,
    pub theme: Theme,
    pub data: T,
}

pub fn page<T: Serialize>(state: &AppState, view: &'static str, data: T) -> Json<Page<T>> {
    Json(Page {
        view,
        theme: state.theme.current(),
        data,
    })
}
