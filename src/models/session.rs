use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user as persisted in local storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "expiresAt", with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Response of `GET /api/auth/user/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub user: RemoteUser,
}
