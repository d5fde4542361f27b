use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::AssistantBackend;
use crate::errors::BackendError;
use crate::models::{
    Assistant, AssistantId, AssistantUpdate, AssistantsResponse, BookingsResponse,
    CreateAssistantForm, CurrentUserResponse, KnowledgeDocument, RegisterResponse, RemoteUser,
};
use crate::services::schedule::DateRange;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: error_message(&body).unwrap_or(body),
        });
    }
    if let Some(message) = error_message(&body) {
        return Err(BackendError::Rejected(message));
    }

    serde_json::from_str(&body).map_err(|e| BackendError::Decode(format!("{what}: {e}")))
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn current_user(&self) -> Result<RemoteUser, BackendError> {
        let resp = self.client.get(self.url("/api/auth/user/me")).send().await?;
        let data: CurrentUserResponse = read_json(resp, "current user").await?;
        Ok(data.user)
    }

    async fn register_assistant(
        &self,
        user_id: i64,
        form: &CreateAssistantForm,
        documents: Vec<KnowledgeDocument>,
    ) -> Result<RegisterResponse, BackendError> {
        let mut body = Form::new()
            .text("user_id", user_id.to_string())
            .text("receptionist_name", form.receptionist_name.clone())
            .text("business_name", form.business_name.clone())
            .text("business_description", form.business_description.clone())
            .text("start_time", form.start_time.to_string())
            .text("end_time", form.end_time.to_string())
            .text(
                "booking_duration_minutes",
                form.booking_duration_minutes.to_string(),
            )
            .text("phone_number", form.phone_number.clone().unwrap_or_default())
            .text("voice_type", form.voice_type.as_str())
            .text("available_days", form.available_days.to_json_string())
            .text("country", form.country.clone().unwrap_or_default());

        for doc in documents {
            let mut part = Part::bytes(doc.bytes).file_name(doc.file_name);
            if let Some(content_type) = doc.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            body = body.part("files", part);
        }

        let resp = self
            .client
            .post(self.url("/api/register"))
            .multipart(body)
            .send()
            .await?;
        read_json(resp, "register").await
    }

    async fn list_assistants(&self, user_id: i64) -> Result<Vec<Assistant>, BackendError> {
        let resp = self
            .client
            .get(self.url("/api/assistants"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let data: AssistantsResponse = read_json(resp, "assistants").await?;
        Ok(data.assistants)
    }

    async fn update_assistant(
        &self,
        id: AssistantId,
        update: &AssistantUpdate,
    ) -> Result<(), BackendError> {
        let resp = self
            .client
            .patch(self.url(&format!("/api/assistant/{id}")))
            .json(update)
            .send()
            .await?;
        let _: serde_json::Value = read_json(resp, "update assistant").await?;
        Ok(())
    }

    async fn fetch_bookings(
        &self,
        assistant_id: AssistantId,
        range: DateRange,
    ) -> Result<BookingsResponse, BackendError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/bookings/{assistant_id}")))
            .query(&[
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
            ])
            .send()
            .await?;
        read_json(resp, "bookings").await
    }
}
