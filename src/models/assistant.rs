use std::collections::{BTreeMap, HashMap};

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::WallTime;
use crate::errors::AppError;

pub type AssistantId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    #[default]
    Female,
    Male,
}

impl VoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceType::Female => "female",
            VoiceType::Male => "male",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "female" => Some(VoiceType::Female),
            "male" => Some(VoiceType::Male),
            _ => None,
        }
    }
}

/// Client-only flag; never sent to the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantStatus {
    #[default]
    Active,
    Inactive,
}

impl AssistantStatus {
    pub fn toggled(self) -> Self {
        match self {
            AssistantStatus::Active => AssistantStatus::Inactive,
            AssistantStatus::Inactive => AssistantStatus::Active,
        }
    }
}

const DAY_NAMES: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

fn parse_day(s: &str) -> Option<Weekday> {
    let lower = s.trim().to_lowercase();
    DAY_NAMES
        .iter()
        .find(|(name, _)| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))
        .map(|(_, day)| *day)
}

/// The set of weekdays an assistant takes bookings on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableDays([bool; 7]);

impl Default for AvailableDays {
    fn default() -> Self {
        Self([true, true, true, true, true, false, false])
    }
}

impl AvailableDays {
    pub fn none() -> Self {
        Self([false; 7])
    }

    pub fn is_enabled(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, enabled: bool) {
        self.0[day.num_days_from_monday() as usize] = enabled;
    }

    pub fn toggle(&mut self, day: Weekday) {
        let idx = day.num_days_from_monday() as usize;
        self.0[idx] = !self.0[idx];
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|d| *d)
    }

    pub fn enabled(&self) -> impl Iterator<Item = Weekday> + '_ {
        DAY_NAMES
            .iter()
            .map(|(_, day)| *day)
            .filter(|day| self.is_enabled(*day))
    }

    /// Short day names joined for display, e.g. `Mon, Tue, Wed`.
    pub fn summary(&self) -> String {
        self.enabled()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The backend expects the day map as an embedded JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for AvailableDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DAY_NAMES.len()))?;
        for (name, day) in DAY_NAMES {
            map.serialize_entry(name, &self.is_enabled(day))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DaysRepr {
    Flags(BTreeMap<String, bool>),
    Names(Vec<String>),
    Encoded(String),
}

impl DaysRepr {
    fn into_days(self) -> Result<AvailableDays, String> {
        let mut days = AvailableDays::none();
        match self {
            DaysRepr::Flags(flags) => {
                for (name, enabled) in flags {
                    let day = parse_day(&name).ok_or_else(|| format!("invalid weekday: {name}"))?;
                    days.set(day, enabled);
                }
            }
            DaysRepr::Names(names) => {
                for name in names {
                    let day = parse_day(&name).ok_or_else(|| format!("invalid weekday: {name}"))?;
                    days.set(day, true);
                }
            }
            DaysRepr::Encoded(raw) => {
                let inner: DaysRepr = serde_json::from_str(&raw)
                    .map_err(|e| format!("invalid available_days: {e}"))?;
                if matches!(inner, DaysRepr::Encoded(_)) {
                    return Err("invalid available_days: nested string".to_string());
                }
                return inner.into_days();
            }
        }
        Ok(days)
    }
}

impl<'de> Deserialize<'de> for AvailableDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        DaysRepr::deserialize(deserializer)?
            .into_days()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assistant {
    pub id: AssistantId,
    pub name: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub description: String,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub booking_duration_minutes: u32,
    #[serde(default)]
    pub available_days: AvailableDays,
    #[serde(default)]
    pub twilio_number: Option<String>,
    #[serde(default)]
    pub voice_type: VoiceType,
    #[serde(default)]
    pub status: AssistantStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantsResponse {
    #[serde(default)]
    pub assistants: Vec<Assistant>,
}

/// Partial update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssistantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<WallTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<WallTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_days: Option<AvailableDays>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_type: Option<VoiceType>,
}

impl AssistantUpdate {
    pub fn is_empty(&self) -> bool {
        *self == AssistantUpdate::default()
    }

    /// Checks the update against the record it will be applied to.
    pub fn validate_against(&self, current: &Assistant) -> Result<(), AppError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if self.booking_duration_minutes == Some(0) {
            return Err(AppError::Validation(
                "booking_duration_minutes must be positive".to_string(),
            ));
        }
        let start = self.start_time.unwrap_or(current.start_time);
        let end = self.end_time.unwrap_or(current.end_time);
        if end <= start {
            return Err(AppError::Validation(format!(
                "end_time {end} must be after start_time {start}"
            )));
        }
        if self.available_days.is_some_and(|d| !d.any()) {
            return Err(AppError::Validation(
                "at least one available day is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fields collected by the creation form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateAssistantForm {
    pub receptionist_name: String,
    pub business_name: String,
    pub business_description: String,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub booking_duration_minutes: u32,
    pub voice_type: VoiceType,
    pub available_days: AvailableDays,
    pub phone_number: Option<String>,
    pub country: Option<String>,
}

impl CreateAssistantForm {
    /// Builds the form from submitted text fields. Missing times, duration,
    /// voice and days fall back to the form defaults (09:00-17:00, 30 minutes,
    /// female, Monday to Friday).
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let text = |key: &str| {
            fields
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let time = |key: &str, default: &str| {
            let raw = fields.get(key).map(String::as_str).unwrap_or(default);
            WallTime::parse(raw).map_err(AppError::Validation)
        };

        let booking_duration_minutes = match fields.get("booking_duration_minutes") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Validation(format!("invalid booking_duration_minutes: {raw}"))
            })?,
            None => 30,
        };

        let voice_type = match fields.get("voice_type") {
            Some(raw) => VoiceType::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid voice_type: {raw}")))?,
            None => VoiceType::default(),
        };

        let available_days = match fields.get("available_days") {
            Some(raw) => serde_json::from_value(serde_json::Value::String(raw.clone()))
                .map_err(|e| AppError::Validation(e.to_string()))?,
            None => AvailableDays::default(),
        };

        let optional = |key: &str| Some(text(key)).filter(|v| !v.is_empty());

        let form = Self {
            receptionist_name: text("receptionist_name"),
            business_name: text("business_name"),
            business_description: text("business_description"),
            start_time: time("start_time", "09:00")?,
            end_time: time("end_time", "17:00")?,
            booking_duration_minutes,
            voice_type,
            available_days,
            phone_number: optional("phone_number"),
            country: optional("country"),
        };
        form.validate()?;
        Ok(form)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.receptionist_name.is_empty() {
            return Err(AppError::Validation("receptionist_name is required".to_string()));
        }
        if self.business_name.is_empty() {
            return Err(AppError::Validation("business_name is required".to_string()));
        }
        if self.business_description.is_empty() {
            return Err(AppError::Validation(
                "business_description is required".to_string(),
            ));
        }
        if self.booking_duration_minutes == 0 {
            return Err(AppError::Validation(
                "booking_duration_minutes must be positive".to_string(),
            ));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::Validation(format!(
                "end_time {} must be after start_time {}",
                self.end_time, self.start_time
            )));
        }
        if !self.available_days.any() {
            return Err(AppError::Validation(
                "at least one available day is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// An optional knowledge document attached to the creation form.
#[derive(Debug, Clone)]
pub struct KnowledgeDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub assistant_id: AssistantId,
    #[serde(default)]
    pub twilio_number: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_available_days_serializes_in_week_order() {
        let json = serde_json::to_string(&AvailableDays::default()).unwrap();
        assert_eq!(
            json,
            r#"{"monday":true,"tuesday":true,"wednesday":true,"thursday":true,"friday":true,"saturday":false,"sunday":false}"#
        );
    }

    #[test]
    fn test_available_days_accepts_names_and_encoded_json() {
        let from_names: AvailableDays = serde_json::from_str(r#"["mon","Saturday"]"#).unwrap();
        assert!(from_names.is_enabled(Weekday::Mon));
        assert!(from_names.is_enabled(Weekday::Sat));
        assert!(!from_names.is_enabled(Weekday::Tue));

        let encoded: AvailableDays =
            serde_json::from_str(r#""{\"sunday\":true,\"monday\":false}""#).unwrap();
        assert_eq!(encoded.summary(), "Sun");

        assert!(serde_json::from_str::<AvailableDays>(r#"["someday"]"#).is_err());
    }

    #[test]
    fn test_available_days_toggle_and_summary() {
        let mut days = AvailableDays::default();
        days.toggle(Weekday::Fri);
        days.toggle(Weekday::Sat);
        assert_eq!(days.summary(), "Mon, Tue, Wed, Thu, Sat");
    }

    #[test]
    fn test_assistant_defaults_client_status() {
        let json = r#"{"id":7,"name":"Alex","business_name":"Acme","description":"Dental",
            "start_time":"09:00","end_time":"17:00","booking_duration_minutes":30,
            "available_days":{"monday":true},"twilio_number":"+15550001111","voice_type":"male"}"#;
        let a: Assistant = serde_json::from_str(json).unwrap();
        assert_eq!(a.status, AssistantStatus::Active);
        assert_eq!(a.voice_type, VoiceType::Male);
        assert_eq!(a.available_days.summary(), "Mon");
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let update = AssistantUpdate {
            name: Some("Max".to_string()),
            booking_duration_minutes: Some(45),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Max", "booking_duration_minutes": 45}));
        assert!(AssistantUpdate::default().is_empty());
    }

    #[test]
    fn test_form_from_fields() {
        let form = CreateAssistantForm::from_fields(&fields(&[
            ("receptionist_name", "Alex"),
            ("business_name", "Acme"),
            ("business_description", "Dental clinic"),
            ("start_time", "10:00"),
            ("end_time", "13:00"),
            ("booking_duration_minutes", "60"),
            ("voice_type", "male"),
            ("available_days", r#"{"monday":true,"friday":true}"#),
        ]))
        .unwrap();
        assert_eq!(form.booking_duration_minutes, 60);
        assert_eq!(form.available_days.summary(), "Mon, Fri");
        assert_eq!(form.phone_number, None);
    }

    #[test]
    fn test_form_rejects_bad_window_and_duration() {
        let base = [
            ("receptionist_name", "Alex"),
            ("business_name", "Acme"),
            ("business_description", "Dental clinic"),
        ];

        let mut inverted = fields(&base);
        inverted.insert("start_time".into(), "13:00".into());
        inverted.insert("end_time".into(), "10:00".into());
        assert!(CreateAssistantForm::from_fields(&inverted).is_err());

        let mut zero = fields(&base);
        zero.insert("booking_duration_minutes".into(), "0".into());
        assert!(CreateAssistantForm::from_fields(&zero).is_err());

        let mut negative = fields(&base);
        negative.insert("booking_duration_minutes".into(), "-15".into());
        assert!(CreateAssistantForm::from_fields(&negative).is_err());

        assert!(CreateAssistantForm::from_fields(&fields(&base[..2])).is_err());
    }
}
