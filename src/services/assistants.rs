use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{
    Assistant, AssistantId, AssistantStatus, AssistantUpdate, CreateAssistantForm,
    KnowledgeDocument, Session,
};
use crate::services::session::UserScoped;
use crate::state::AppState;

#[derive(Default)]
struct DirectoryInner {
    entries: BTreeMap<AssistantId, Assistant>,
    // created here but not yet returned by a listing
    pending: BTreeSet<AssistantId>,
}

/// The user's assistants, keyed by id.
#[derive(Default)]
pub struct AssistantDirectory {
    inner: RwLock<DirectoryInner>,
}

impl AssistantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a fresh listing. Records are replaced by id, the client-only
    /// status is kept, and records missing from the listing are dropped unless
    /// they were just created.
    pub fn merge(&self, fetched: Vec<Assistant>) {
        let mut inner = self.inner.write().unwrap();
        let mut next = BTreeMap::new();

        for mut assistant in fetched {
            if let Some(existing) = inner.entries.get(&assistant.id) {
                assistant.status = existing.status;
            }
            inner.pending.remove(&assistant.id);
            next.insert(assistant.id, assistant);
        }

        let pending: Vec<AssistantId> = inner.pending.iter().copied().collect();
        for id in pending {
            if let Some(assistant) = inner.entries.remove(&id) {
                next.insert(id, assistant);
            }
        }

        inner.entries = next;
    }

    pub fn insert_created(&self, assistant: Assistant) {
        let mut inner = self.inner.write().unwrap();
        inner.pending.insert(assistant.id);
        inner.entries.insert(assistant.id, assistant);
    }

    pub fn get(&self, id: AssistantId) -> Option<Assistant> {
        self.inner.read().unwrap().entries.get(&id).cloned()
    }

    pub fn list(&self) -> Vec<Assistant> {
        self.inner.read().unwrap().entries.values().cloned().collect()
    }

    pub fn first_id(&self) -> Option<AssistantId> {
        self.inner.read().unwrap().entries.keys().next().copied()
    }

    pub fn set_status(&self, id: AssistantId, status: AssistantStatus) -> Option<Assistant> {
        let mut inner = self.inner.write().unwrap();
        let entry = inner.entries.get_mut(&id)?;
        entry.status = status;
        Some(entry.clone())
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = DirectoryInner::default();
    }
}

impl UserScoped for AssistantDirectory {
    fn reset(&self) {
        self.clear();
    }
}

pub fn assistant_from_form(
    id: AssistantId,
    form: &CreateAssistantForm,
    twilio_number: Option<String>,
) -> Assistant {
    Assistant {
        id,
        name: form.receptionist_name.clone(),
        business_name: form.business_name.clone(),
        description: form.business_description.clone(),
        start_time: form.start_time,
        end_time: form.end_time,
        booking_duration_minutes: form.booking_duration_minutes,
        available_days: form.available_days,
        twilio_number,
        voice_type: form.voice_type,
        status: AssistantStatus::Active,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub assistants: Vec<Assistant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedAssistant {
    pub assistant_id: AssistantId,
    pub twilio_number: Option<String>,
    pub message: String,
    pub navigate: &'static str,
}

pub async fn refresh(state: &AppState, user_id: i64) -> Result<Vec<Assistant>, AppError> {
    let fetched = state.backend.list_assistants(user_id).await?;
    tracing::debug!(user_id, count = fetched.len(), "fetched assistants");
    state.assistants.merge(fetched);
    Ok(state.assistants.list())
}

/// Listing for the dashboard. A failed fetch keeps the last known records.
pub async fn load_dashboard(state: &AppState, session: &Session) -> DashboardView {
    match refresh(state, session.id).await {
        Ok(assistants) => DashboardView {
            assistants,
            error: None,
        },
        Err(e) => {
            state.notifier.error("dashboard", &e);
            DashboardView {
                assistants: state.assistants.list(),
                error: Some(e.to_string()),
            }
        }
    }
}

pub async fn create(
    state: &AppState,
    session: &Session,
    mut form: CreateAssistantForm,
    documents: Vec<KnowledgeDocument>,
) -> Result<CreatedAssistant, AppError> {
    if let Err(e) = form.validate() {
        state.notifier.error("create", &e);
        return Err(e);
    }
    form.phone_number
        .get_or_insert_with(|| state.config.default_phone_number.clone());
    form.country
        .get_or_insert_with(|| state.config.default_country.clone());

    tracing::info!(
        user_id = session.id,
        name = %form.receptionist_name,
        documents = documents.len(),
        "registering assistant"
    );

    let resp = match state
        .backend
        .register_assistant(session.id, &form, documents)
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            let err = AppError::from(e);
            state.notifier.error("create", &err);
            return Err(err);
        }
    };

    state.assistants.insert_created(assistant_from_form(
        resp.assistant_id,
        &form,
        resp.twilio_number.clone(),
    ));

    let message = if resp.message.is_empty() {
        format!("Assistant {} created", form.receptionist_name)
    } else {
        resp.message
    };
    state.notifier.success("create", &message);

    Ok(CreatedAssistant {
        assistant_id: resp.assistant_id,
        twilio_number: resp.twilio_number,
        message,
        navigate: "/dashboard",
    })
}

/// Sends a partial update, then reloads the whole listing.
pub async fn update(
    state: &AppState,
    session: &Session,
    id: AssistantId,
    update: AssistantUpdate,
) -> Result<Vec<Assistant>, AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }

    let current = match state.assistants.get(id) {
        Some(a) => a,
        None => {
            refresh(state, session.id).await?;
            state
                .assistants
                .get(id)
                .ok_or_else(|| AppError::NotFound(format!("assistant {id}")))?
        }
    };
    update.validate_against(&current)?;

    if let Err(e) = state.backend.update_assistant(id, &update).await {
        let err = AppError::from(e);
        state.notifier.error("dashboard", &err);
        return Err(err);
    }
    tracing::info!(assistant_id = id, "assistant updated");

    refresh(state, session.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailableDays, VoiceType, WallTime};

    fn assistant(id: AssistantId, name: &str) -> Assistant {
        Assistant {
            id,
            name: name.to_string(),
            business_name: "Acme".to_string(),
            description: "Dental clinic".to_string(),
            start_time: WallTime::parse("09:00").unwrap(),
            end_time: WallTime::parse("17:00").unwrap(),
            booking_duration_minutes: 30,
            available_days: AvailableDays::default(),
            twilio_number: None,
            voice_type: VoiceType::Female,
            status: AssistantStatus::Active,
        }
    }

    #[test]
    fn test_merge_by_key_has_no_duplicates() {
        let dir = AssistantDirectory::new();
        dir.merge(vec![assistant(1, "Alex"), assistant(2, "Max")]);
        dir.merge(vec![assistant(2, "Maxine"), assistant(1, "Alex")]);

        let names: Vec<String> = dir.list().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Alex", "Maxine"]);
    }

    #[test]
    fn test_merge_keeps_client_status() {
        let dir = AssistantDirectory::new();
        dir.merge(vec![assistant(1, "Alex")]);
        dir.set_status(1, AssistantStatus::Inactive).unwrap();

        dir.merge(vec![assistant(1, "Alex")]);
        assert_eq!(dir.get(1).unwrap().status, AssistantStatus::Inactive);
    }

    #[test]
    fn test_created_entry_survives_lagging_listing() {
        let dir = AssistantDirectory::new();
        dir.merge(vec![assistant(1, "Alex")]);
        dir.insert_created(assistant(7, "Sam"));

        dir.merge(vec![assistant(1, "Alex")]);
        assert!(dir.get(7).is_some());

        dir.merge(vec![assistant(7, "Samantha")]);
        assert_eq!(dir.get(7).unwrap().name, "Samantha");
        assert!(dir.get(1).is_none());

        dir.merge(vec![]);
        assert!(dir.list().is_empty());
    }

    #[test]
    fn test_set_status_unknown_id() {
        let dir = AssistantDirectory::new();
        assert!(dir.set_status(3, AssistantStatus::Inactive).is_none());
    }
}
