use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AssistantId, Booking, BookingsResponse, TimeSlot};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
}

/// Inclusive date bounds sent to the bookings endpoint.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// First day of the anchor's week. Weeks start on Sunday.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(i64::from(anchor.weekday().num_days_from_sunday()))
}

fn month_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    first
        .iter_days()
        .take_while(|d| d.month() == anchor.month())
        .collect()
}

/// Every calendar date shown by `mode` around `anchor`, in order.
pub fn resolve_dates(mode: ViewMode, anchor: NaiveDate) -> Vec<NaiveDate> {
    match mode {
        ViewMode::Day => vec![anchor],
        ViewMode::Week => week_start(anchor).iter_days().take(7).collect(),
        ViewMode::Month => month_days(anchor),
    }
}

pub fn query_range(mode: ViewMode, anchor: NaiveDate) -> DateRange {
    match mode {
        ViewMode::Day => DateRange {
            start: anchor,
            end: anchor,
        },
        ViewMode::Week => {
            let start = week_start(anchor);
            DateRange {
                start,
                end: start + Duration::days(6),
            }
        }
        ViewMode::Month => {
            let days = month_days(anchor);
            DateRange {
                start: days.first().copied().unwrap_or(anchor),
                end: days.last().copied().unwrap_or(anchor),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DayAvailability {
    NoSlots,
    Slots { slots: Vec<TimeSlot> },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub label: String,
    #[serde(flatten)]
    pub availability: DayAvailability,
}

/// Everything the schedule page renders for one load.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleView {
    pub assistant_id: AssistantId,
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub range: DateRange,
    pub slot_duration: Option<u32>,
    pub business_hours: Option<String>,
    pub days: Vec<DaySchedule>,
    pub bookings: Vec<Booking>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bookings whose date is one of `dates`, ordered by date then time.
pub fn bookings_in_range(bookings: &[Booking], dates: &[NaiveDate]) -> Vec<Booking> {
    let wanted: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    let mut selected: Vec<Booking> = bookings
        .iter()
        .filter(|b| wanted.contains(&b.date))
        .cloned()
        .collect();
    selected.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    selected
}

fn day_availability(date: NaiveDate, response: &BookingsResponse) -> DayAvailability {
    let Some(backend_slots) = response.slots.get(&date).filter(|s| !s.is_empty()) else {
        return DayAvailability::NoSlots;
    };

    let slots = backend_slots
        .iter()
        .map(|slot| {
            let mut ts = TimeSlot::from_backend(date, slot);
            if ts.is_booked {
                ts.booking = response
                    .bookings
                    .iter()
                    .find(|b| b.date == date && b.time == slot.time)
                    .cloned();
            }
            ts
        })
        .collect();

    DayAvailability::Slots { slots }
}

pub fn build_schedule(
    assistant_id: AssistantId,
    mode: ViewMode,
    anchor: NaiveDate,
    response: &BookingsResponse,
) -> ScheduleView {
    let dates = resolve_dates(mode, anchor);

    let days = dates
        .iter()
        .map(|date| DaySchedule {
            date: *date,
            label: format_long_date(*date),
            availability: day_availability(*date, response),
        })
        .collect();

    ScheduleView {
        assistant_id,
        view: mode,
        anchor,
        range: query_range(mode, anchor),
        slot_duration: Some(response.slot_duration),
        business_hours: response.business_hours.clone(),
        days,
        bookings: bookings_in_range(&response.bookings, &dates),
        error: None,
    }
}

/// The schedule shown when the fetch failed: every day without slots.
pub fn empty_schedule(
    assistant_id: AssistantId,
    mode: ViewMode,
    anchor: NaiveDate,
    error: impl Into<String>,
) -> ScheduleView {
    let days = resolve_dates(mode, anchor)
        .into_iter()
        .map(|date| DaySchedule {
            date,
            label: format_long_date(date),
            availability: DayAvailability::NoSlots,
        })
        .collect();

    ScheduleView {
        assistant_id,
        view: mode,
        anchor,
        range: query_range(mode, anchor),
        slot_duration: None,
        business_hours: None,
        days,
        bookings: Vec::new(),
        error: Some(error.into()),
    }
}

/// Fetches and merges one schedule load. A failed fetch degrades to an empty
/// schedule carrying the error; a load superseded by a newer one or by the
/// view closing is discarded.
pub async fn load_schedule(
    state: &AppState,
    assistant_id: AssistantId,
    mode: ViewMode,
    anchor: NaiveDate,
) -> Result<ScheduleView, AppError> {
    let token = state.schedule.begin();
    let range = query_range(mode, anchor);

    let view = match state.backend.fetch_bookings(assistant_id, range).await {
        Ok(response) => build_schedule(assistant_id, mode, anchor, &response),
        Err(e) => {
            state.notifier.error("schedule", &e);
            empty_schedule(assistant_id, mode, anchor, e.to_string())
        }
    };

    if !state.schedule.apply(token, view.clone()) {
        tracing::debug!(assistant_id, "discarding schedule for a closed view");
        return Err(AppError::Stale(
            "schedule view changed before the load finished".to_string(),
        ));
    }
    Ok(view)
}

/// `2024-03-15` -> `Friday, March 15, 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
