use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::LocalStorage;
use crate::errors::AppError;
use crate::services::assistants::AssistantDirectory;
use crate::services::backend::AssistantBackend;
use crate::services::notifications::Notifier;
use crate::services::schedule::ScheduleView;
use crate::services::session::SessionStore;
use crate::services::theme::ThemeStore;
use crate::services::view::ScopedView;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Box<dyn AssistantBackend>,
    pub session: Arc<SessionStore>,
    pub theme: ThemeStore,
    pub notifier: Notifier,
    pub assistants: Arc<AssistantDirectory>,
    pub schedule: Arc<ScopedView<ScheduleView>>,
}

impl AppState {
    /// Wires the stores over `storage`. The session store stays `Loading`
    /// until [`SessionStore::init`] runs, and resets the assistant directory
    /// and schedule view when the signed-in user changes.
    pub fn new(
        config: AppConfig,
        storage: LocalStorage,
        backend: Box<dyn AssistantBackend>,
    ) -> Result<Self, AppError> {
        let assistants = Arc::new(AssistantDirectory::new());
        let schedule: Arc<ScopedView<ScheduleView>> = Arc::new(ScopedView::new());
        let session = SessionStore::new(
            storage.clone(),
            chrono::Duration::minutes(config.session_ttl_minutes),
        )
        .with_scoped(assistants.clone())
        .with_scoped(schedule.clone());
        let theme = ThemeStore::init(storage.clone(), config.default_theme)?;

        Ok(Self {
            backend,
            session: Arc::new(session),
            theme,
            notifier: Notifier::new(storage),
            assistants,
            schedule,
            config,
        })
    }
}
