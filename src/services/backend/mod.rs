pub mod http;

use async_trait::async_trait;

use crate::errors::BackendError;
use crate::models::{
    Assistant, AssistantId, AssistantUpdate, BookingsResponse, CreateAssistantForm,
    KnowledgeDocument, RegisterResponse, RemoteUser,
};
use crate::services::schedule::DateRange;

/// The remote voice-assistant API.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn current_user(&self) -> Result<RemoteUser, BackendError>;

    async fn register_assistant(
        &self,
        user_id: i64,
        form: &CreateAssistantForm,
        documents: Vec<KnowledgeDocument>,
    ) -> Result<RegisterResponse, BackendError>;

    async fn list_assistants(&self, user_id: i64) -> Result<Vec<Assistant>, BackendError>;

    async fn update_assistant(
        &self,
        id: AssistantId,
        update: &AssistantUpdate,
    ) -> Result<(), BackendError>;

    async fn fetch_bookings(
        &self,
        assistant_id: AssistantId,
        range: DateRange,
    ) -> Result<BookingsResponse, BackendError>;
}
