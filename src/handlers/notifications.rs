use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use axum::Json;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::Notice;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NoticesQuery {
    pub since: Option<i64>,
    pub limit: Option<i64>,
}

// GET /api/notifications
pub async fn list_notices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticesQuery>,
) -> Result<Json<Vec<Notice>>, AppError> {
    let notices = state
        .notifier
        .since(query.since.unwrap_or(0), query.limit.unwrap_or(50).clamp(1, 500))?;
    Ok(Json(notices))
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub last_id: Option<i64>,
}

fn notice_event(notice: &Notice) -> Event {
    let data = serde_json::to_string(notice).unwrap_or_default();
    Event::default()
        .id(notice.id.to_string())
        .data(data)
        .event("notice")
}

// GET /api/notifications/events
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let last_id = query.last_id.unwrap_or(0);

    // subscribe before the catch-up read so nothing falls in between
    let rx = state.notifier.subscribe();
    let catchup = state.notifier.since(last_id, 500).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load missed notices");
        Vec::new()
    });
    let high_water = catchup.last().map(|n| n.id).unwrap_or(last_id);

    let catchup_stream =
        tokio_stream::iter(catchup.into_iter().map(|n| Ok::<_, Infallible>(notice_event(&n))));

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(notice) if notice.id > high_water => Some(Ok(notice_event(&notice))),
        Ok(_) => None,
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => None,
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    let combined = catchup_stream.chain(live_stream);
    Sse::new(StreamExt::merge(combined, keepalive_stream))
}
