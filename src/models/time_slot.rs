use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BackendSlot, Booking, WallTime};

/// One bookable point of a day, recomputed from every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub id: String,
    pub date: NaiveDate,
    pub time: WallTime,
    pub label: String,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

impl TimeSlot {
    pub fn from_backend(date: NaiveDate, slot: &BackendSlot) -> Self {
        Self {
            id: format!("{date}-{}", slot.time),
            date,
            time: slot.time,
            label: slot.time.to_12h_string(),
            is_booked: slot.is_booked,
            booking: None,
        }
    }
}
