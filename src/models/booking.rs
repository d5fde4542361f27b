use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WallTime;

/// A booking as reported by the backend. Read-only on this side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub date: NaiveDate,
    pub time: WallTime,
    pub customer_name: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSlot {
    pub time: WallTime,
    pub is_booked: bool,
}

/// Response of `GET /api/bookings/<assistant_id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsResponse {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub slots: BTreeMap<NaiveDate, Vec<BackendSlot>>,
    #[serde(default)]
    pub business_hours: Option<String>,
    pub slot_duration: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bookings_response() {
        let json = r#"{
            "bookings": [
                {"id": 3, "date": "2024-03-15", "time": "10:30", "customer_name": "Alice",
                 "details": null, "created_at": "2024-03-01T12:00:00"}
            ],
            "slots": {
                "2024-03-15": [{"time": "10:00", "is_booked": false}, {"time": "10:30", "is_booked": true}]
            },
            "business_hours": "09:00-17:00",
            "slot_duration": 30
        }"#;

        let resp: BookingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.bookings.len(), 1);
        assert_eq!(resp.bookings[0].details, None);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(resp.slots[&day].len(), 2);
        assert!(resp.slots[&day][1].is_booked);
        assert_eq!(resp.slot_duration, 30);
    }
}
