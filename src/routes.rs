use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Knowledge documents ride along with the creation form.
const CREATE_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn app(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/", get(handlers::plans::landing))
        .route("/plans", get(handlers::plans::list_plans))
        .route("/login", get(handlers::auth::login_page))
        .route("/auth/login", get(handlers::auth::start_login))
        .route("/auth/callback", get(handlers::auth::auth_callback))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/api/session", get(handlers::auth::session_status))
        .route("/api/theme", get(handlers::theme::get_theme))
        .route("/api/theme/toggle", post(handlers::theme::toggle_theme))
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notices),
        )
        .route(
            "/api/notifications/events",
            get(handlers::notifications::events_stream),
        );

    // Handlers below check the session themselves.
    let protected = Router::new()
        .route("/dashboard", get(handlers::assistants::dashboard))
        .route(
            "/dashboard/assistants/:id",
            patch(handlers::assistants::update_assistant),
        )
        .route(
            "/dashboard/assistants/:id/status",
            post(handlers::assistants::set_status),
        )
        .route("/create/preview", get(handlers::assistants::preview))
        .route(
            "/create",
            post(handlers::assistants::create_assistant)
                .layer(DefaultBodyLimit::max(CREATE_BODY_LIMIT)),
        )
        .route("/schedule", get(handlers::schedule::get_schedule))
        .route(
            "/schedule/current",
            get(handlers::schedule::current_schedule),
        )
        .route("/schedule/view", delete(handlers::schedule::close_view))
        .route(
            "/plans/:id/subscribe",
            post(handlers::plans::subscribe),
        );

    public.merge(protected).with_state(state)
}
