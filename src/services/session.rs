use std::sync::{Arc, RwLock};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::db::LocalStorage;
use crate::errors::AppError;
use crate::models::Session;
use crate::services::backend::AssistantBackend;

pub const SESSION_STORAGE_KEY: &str = "schedule_ai_user";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

/// State that belongs to the signed-in user and is dropped when they change.
pub trait UserScoped: Send + Sync {
    fn reset(&self);
}

impl SessionState {
    fn user_id(&self) -> Option<i64> {
        match self {
            SessionState::Authenticated(session) => Some(session.id),
            _ => None,
        }
    }
}

/// Who is signed in, backed by the persisted session record.
pub struct SessionStore {
    storage: LocalStorage,
    ttl: Duration,
    state: RwLock<SessionState>,
    scoped: Vec<Arc<dyn UserScoped>>,
}

impl SessionStore {
    pub fn new(storage: LocalStorage, ttl: Duration) -> Self {
        Self {
            storage,
            ttl,
            state: RwLock::new(SessionState::Loading),
            scoped: Vec::new(),
        }
    }

    /// Registers state to reset whenever the signed-in user changes or signs out.
    pub fn with_scoped(mut self, scoped: Arc<dyn UserScoped>) -> Self {
        self.scoped.push(scoped);
        self
    }

    fn transition(&self, next: SessionState) {
        let previous = {
            let mut state = self.state.write().unwrap();
            std::mem::replace(&mut *state, next.clone())
        };

        let (was, now) = (previous.user_id(), next.user_id());
        if was.is_some() && was != now {
            tracing::debug!(previous = ?was, next = ?now, "signed-in user changed, dropping user state");
            for scoped in &self.scoped {
                scoped.reset();
            }
        }
    }

    /// Reads the persisted record and leaves the `Loading` state.
    pub fn init(&self) -> Result<SessionState, AppError> {
        self.check_expiry_at(Utc::now())
    }

    pub fn check_expiry(&self) -> Result<SessionState, AppError> {
        self.check_expiry_at(Utc::now())
    }

    /// Re-reads the stored session; an expired or malformed record is removed.
    pub fn check_expiry_at(&self, now: DateTime<Utc>) -> Result<SessionState, AppError> {
        let next = match self.storage.get_item(SESSION_STORAGE_KEY)? {
            None => SessionState::Unauthenticated,
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) if session.is_expired_at(now) => {
                    tracing::info!(user_id = session.id, "session expired, logging out");
                    self.storage.remove_item(SESSION_STORAGE_KEY)?;
                    SessionState::Unauthenticated
                }
                Ok(session) => SessionState::Authenticated(session),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed stored session");
                    self.storage.remove_item(SESSION_STORAGE_KEY)?;
                    SessionState::Unauthenticated
                }
            },
        };

        self.transition(next.clone());
        Ok(next)
    }

    /// Current state; an expired session is never reported as authenticated.
    pub fn current_at(&self, now: DateTime<Utc>) -> SessionState {
        match &*self.state.read().unwrap() {
            SessionState::Authenticated(s) if s.is_expired_at(now) => SessionState::Unauthenticated,
            other => other.clone(),
        }
    }

    pub fn current(&self) -> SessionState {
        self.current_at(Utc::now())
    }

    pub fn require_user(&self) -> Result<Session, AppError> {
        match self.current() {
            SessionState::Authenticated(session) => Ok(session),
            SessionState::Loading => Err(AppError::SessionLoading),
            SessionState::Unauthenticated => Err(AppError::Unauthorized),
        }
    }

    pub fn store(&self, session: Session) -> Result<(), AppError> {
        let raw = serde_json::to_string(&session)?;
        self.storage.set_item(SESSION_STORAGE_KEY, &raw)?;
        self.transition(SessionState::Authenticated(session));
        Ok(())
    }

    /// Completes the OAuth round trip: asks the backend who signed in and
    /// stores a session that expires after the configured lifetime.
    pub async fn complete_login(
        &self,
        backend: &dyn AssistantBackend,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let user = backend.current_user().await?;
        let session = Session {
            id: user.id,
            name: user.name,
            email: user.email,
            expires_at: now + self.ttl,
        };
        self.store(session.clone())?;
        tracing::info!(user_id = session.id, expires_at = %session.expires_at, "signed in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.storage.remove_item(SESSION_STORAGE_KEY)?;
        self.transition(SessionState::Unauthenticated);
        Ok(())
    }
}

/// Re-validates the session on a fixed interval for as long as the app runs.
pub fn spawn_expiry_watcher(store: Arc<SessionStore>, period: StdDuration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = store.check_expiry() {
                tracing::error!(error = %e, "session expiry check failed");
            }
        }
    })
}

/// Where the browser is sent to start the OAuth flow.
pub fn login_redirect_url(auth_base_url: &str, public_url: &str) -> Result<String, AppError> {
    let callback = format!("{}/auth/callback", public_url.trim_end_matches('/'));
    let url = reqwest::Url::parse_with_params(
        &format!(
            "{}/api/auth/google/login",
            auth_base_url.trim_end_matches('/')
        ),
        &[("callback", callback)],
    )
    .map_err(|e| AppError::Validation(format!("invalid auth url: {e}")))?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::errors::BackendError;
    use crate::models::{
        Assistant, AssistantId, AssistantUpdate, BookingsResponse, CreateAssistantForm,
        KnowledgeDocument, RegisterResponse, RemoteUser,
    };
    use crate::services::schedule::DateRange;
    use async_trait::async_trait;

    struct UserOnlyBackend {
        user: Option<RemoteUser>,
    }

    #[async_trait]
    impl AssistantBackend for UserOnlyBackend {
        async fn current_user(&self) -> Result<RemoteUser, BackendError> {
            self.user.clone().ok_or(BackendError::Status {
                status: 401,
                body: "not signed in".to_string(),
            })
        }

        async fn register_assistant(
            &self,
            _user_id: i64,
            _form: &CreateAssistantForm,
            _documents: Vec<KnowledgeDocument>,
        ) -> Result<RegisterResponse, BackendError> {
            unimplemented!()
        }

        async fn list_assistants(&self, _user_id: i64) -> Result<Vec<Assistant>, BackendError> {
            unimplemented!()
        }

        async fn update_assistant(
            &self,
            _id: AssistantId,
            _update: &AssistantUpdate,
        ) -> Result<(), BackendError> {
            unimplemented!()
        }

        async fn fetch_bookings(
            &self,
            _assistant_id: AssistantId,
            _range: DateRange,
        ) -> Result<BookingsResponse, BackendError> {
            unimplemented!()
        }
    }

    fn store() -> (SessionStore, LocalStorage) {
        let storage = LocalStorage::new(db::init_db(":memory:").unwrap());
        (SessionStore::new(storage.clone(), Duration::minutes(30)), storage)
    }

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: 9,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_starts_loading_then_unauthenticated() {
        let (store, _) = store();
        assert_eq!(store.current(), SessionState::Loading);
        assert!(matches!(store.require_user(), Err(AppError::SessionLoading)));

        assert_eq!(store.init().unwrap(), SessionState::Unauthenticated);
        assert!(matches!(store.require_user(), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_record_is_removed_on_init() {
        let (store, storage) = store();
        let stale = session(Utc::now() - Duration::minutes(1));
        storage
            .set_item(SESSION_STORAGE_KEY, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        assert_eq!(store.init().unwrap(), SessionState::Unauthenticated);
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_record_is_removed() {
        let (store, storage) = store();
        storage.set_item(SESSION_STORAGE_KEY, "{not json").unwrap();

        assert_eq!(store.init().unwrap(), SessionState::Unauthenticated);
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_valid_record_survives_restart() {
        let (store, storage) = store();
        let live = session(Utc::now() + Duration::minutes(10));
        store.store(live.clone()).unwrap();

        let restarted = SessionStore::new(storage, Duration::minutes(30));
        assert_eq!(restarted.init().unwrap(), SessionState::Authenticated(live));
    }

    #[test]
    fn test_expired_in_memory_never_authenticated() {
        let (store, _) = store();
        let now = Utc::now();
        store.store(session(now + Duration::minutes(5))).unwrap();

        let later = now + Duration::minutes(6);
        assert_eq!(store.current_at(later), SessionState::Unauthenticated);
        assert_eq!(store.check_expiry_at(later).unwrap(), SessionState::Unauthenticated);
    }

    #[derive(Default)]
    struct ResetCounter(std::sync::atomic::AtomicUsize);

    impl UserScoped for ResetCounter {
        fn reset(&self) {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl ResetCounter {
        fn count(&self) -> usize {
            self.0.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[test]
    fn test_user_state_reset_when_user_leaves_or_changes() {
        let storage = LocalStorage::new(db::init_db(":memory:").unwrap());
        let counter = Arc::new(ResetCounter::default());
        let store = SessionStore::new(storage, Duration::minutes(30)).with_scoped(counter.clone());
        let now = Utc::now();

        store.init().unwrap();
        store.store(session(now + Duration::minutes(5))).unwrap();
        store.store(session(now + Duration::minutes(10))).unwrap();
        assert_eq!(counter.count(), 0);

        store.check_expiry_at(now + Duration::minutes(11)).unwrap();
        assert_eq!(counter.count(), 1);

        store.store(session(now + Duration::minutes(20))).unwrap();
        store
            .store(Session {
                id: 10,
                ..session(now + Duration::minutes(20))
            })
            .unwrap();
        assert_eq!(counter.count(), 2);

        store.logout().unwrap();
        assert_eq!(counter.count(), 3);
    }

    #[tokio::test]
    async fn test_complete_login_sets_expiry() {
        let (store, storage) = store();
        let backend = UserOnlyBackend {
            user: Some(RemoteUser {
                id: 5,
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
            }),
        };
        let now = Utc::now();

        let session = store.complete_login(&backend, now).await.unwrap();
        assert_eq!(session.expires_at, now + Duration::minutes(30));
        assert!(storage.get_item(SESSION_STORAGE_KEY).unwrap().is_some());
        assert!(store.require_user().is_ok());

        store.logout().unwrap();
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY).unwrap(), None);
        assert_eq!(store.current(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_complete_login_failure_keeps_signed_out() {
        let (store, storage) = store();
        store.init().unwrap();
        let backend = UserOnlyBackend { user: None };

        assert!(store.complete_login(&backend, Utc::now()).await.is_err());
        assert_eq!(store.current(), SessionState::Unauthenticated);
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_login_redirect_url_encodes_callback() {
        let url = login_redirect_url("http://localhost:5000/", "http://localhost:3000").unwrap();
        assert_eq!(
            url,
            "http://localhost:5000/api/auth/google/login?callback=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback"
        );
    }
}
