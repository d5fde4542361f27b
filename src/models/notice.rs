use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "success" => NoticeLevel::Success,
            "error" => NoticeLevel::Error,
            _ => NoticeLevel::Info,
        }
    }
}

/// A user-visible outcome raised by one of the views.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notice {
    pub id: i64,
    pub level: NoticeLevel,
    pub source: String,
    pub message: String,
    pub created_at: String,
}
