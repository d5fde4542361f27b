use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AvailableDays, WallTime};

pub const MAX_PREVIEW_SLOTS: usize = 5;
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot duration must be positive")]
    NonPositiveDuration,

    #[error("slot duration must not exceed a day ({0} minutes)")]
    LongerThanDay(u32),
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Number of whole slots that fit between `start` and `end`.
pub fn slot_count(start: WallTime, end: WallTime, duration_minutes: u32) -> Result<u32, SlotError> {
    if duration_minutes == 0 {
        return Err(SlotError::NonPositiveDuration);
    }
    if duration_minutes > WallTime::MINUTES_PER_DAY {
        return Err(SlotError::LongerThanDay(WallTime::MINUTES_PER_DAY));
    }
    if end <= start {
        return Ok(0);
    }
    Ok((end.minutes() - start.minutes()) / duration_minutes)
}

/// The first few slot start times of an operating window, formatted `HH:MM`.
/// A slot is listed only when it also ends by `end`.
///
/// At most [`MAX_PREVIEW_SLOTS`] times are listed; when the window holds more,
/// a single [`TRUNCATION_MARKER`] follows them.
pub fn generate_sample_slots(
    start: WallTime,
    end: WallTime,
    duration_minutes: u32,
) -> Result<Vec<String>, SlotError> {
    let total = slot_count(start, end, duration_minutes)? as usize;

    let mut slots: Vec<String> = (start.minutes()..end.minutes())
        .step_by(duration_minutes as usize)
        .take_while(|m| end.minutes() - m >= duration_minutes)
        .take(MAX_PREVIEW_SLOTS)
        .filter_map(WallTime::from_minutes)
        .map(|t| t.to_string())
        .collect();

    if total > MAX_PREVIEW_SLOTS {
        slots.push(TRUNCATION_MARKER.to_string());
    }
    Ok(slots)
}

/// Preview shown next to the creation form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotPreview {
    pub available: String,
    pub hours: String,
    pub slot_duration: u32,
    pub total_slots: u32,
    pub slots: Vec<String>,
}

pub fn preview(
    start: WallTime,
    end: WallTime,
    duration_minutes: u32,
    days: &AvailableDays,
) -> Result<SlotPreview, SlotError> {
    Ok(SlotPreview {
        available: days.summary(),
        hours: format!("{start} - {end}"),
        slot_duration: duration_minutes,
        total_slots: slot_count(start, end, duration_minutes)?,
        slots: generate_sample_slots(start, end, duration_minutes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> WallTime {
        WallTime::parse(s).unwrap()
    }

    #[test]
    fn test_truncates_long_day() {
        let slots = generate_sample_slots(t("09:00"), t("17:00"), 30).unwrap();
        assert_eq!(slots, vec!["09:00", "09:30", "10:00", "10:30", "11:00", "..."]);
    }

    #[test]
    fn test_window_smaller_than_slot() {
        let slots = generate_sample_slots(t("09:00"), t("09:15"), 30).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_trailing_partial_slot_dropped() {
        let slots = generate_sample_slots(t("09:00"), t("10:45"), 30).unwrap();
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_end_before_start_is_empty() {
        assert!(generate_sample_slots(t("17:00"), t("09:00"), 30).unwrap().is_empty());
        assert!(generate_sample_slots(t("09:00"), t("09:00"), 30).unwrap().is_empty());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(
            generate_sample_slots(t("09:00"), t("17:00"), 0),
            Err(SlotError::NonPositiveDuration)
        );
    }

    #[test]
    fn test_duration_longer_than_a_day_rejected() {
        assert_eq!(
            generate_sample_slots(t("09:00"), t("17:00"), u32::MAX),
            Err(SlotError::LongerThanDay(WallTime::MINUTES_PER_DAY))
        );
        assert!(preview(t("09:00"), t("17:00"), 1441, &AvailableDays::default()).is_err());

        let whole_day = generate_sample_slots(t("00:00"), t("23:59"), WallTime::MINUTES_PER_DAY);
        assert_eq!(whole_day, Ok(Vec::new()));
    }

    #[test]
    fn test_exactly_five_slots_has_no_marker() {
        let slots = generate_sample_slots(t("10:00"), t("15:00"), 60).unwrap();
        assert_eq!(slots, vec!["10:00", "11:00", "12:00", "13:00", "14:00"]);
    }

    #[test]
    fn test_partial_sixth_slot_has_no_marker() {
        let slots = generate_sample_slots(t("10:00"), t("15:10"), 60).unwrap();
        assert_eq!(slots.len(), 5);

        let slots = generate_sample_slots(t("10:00"), t("16:00"), 60).unwrap();
        assert_eq!(slots.len(), 6);
        assert_eq!(slots.last().map(String::as_str), Some(TRUNCATION_MARKER));
    }

    #[test]
    fn test_marker_iff_more_than_five() {
        for duration in [5u32, 15, 20, 30, 45, 60, 90, 120] {
            for end in ["09:30", "10:00", "11:15", "13:00", "17:00", "23:59"] {
                let total = slot_count(t("09:00"), t(end), duration).unwrap() as usize;
                let slots = generate_sample_slots(t("09:00"), t(end), duration).unwrap();
                let has_marker = slots.last().map(String::as_str) == Some(TRUNCATION_MARKER);
                assert_eq!(has_marker, total > MAX_PREVIEW_SLOTS, "{duration} {end}");
                assert_eq!(slots.len(), total.min(MAX_PREVIEW_SLOTS) + has_marker as usize);
            }
        }
    }

    #[test]
    fn test_preview_summary() {
        let p = preview(t("10:00"), t("13:00"), 60, &AvailableDays::default()).unwrap();
        assert_eq!(p.available, "Mon, Tue, Wed, Thu, Fri");
        assert_eq!(p.total_slots, 3);
        assert_eq!(p.slots, vec!["10:00", "11:00", "12:00"]);
    }
}
