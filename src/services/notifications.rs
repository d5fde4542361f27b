use tokio::sync::broadcast;

use crate::db::LocalStorage;
use crate::models::{Notice, NoticeLevel};

/// Records view outcomes and fans them out to live subscribers.
pub struct Notifier {
    storage: LocalStorage,
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(storage: LocalStorage) -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { storage, tx }
    }

    pub fn record(&self, level: NoticeLevel, source: &str, message: &str) -> Option<Notice> {
        match self.storage.insert_notice(level, source, message) {
            Ok(notice) => {
                // No receivers is fine
                let _ = self.tx.send(notice.clone());
                Some(notice)
            }
            Err(e) => {
                tracing::error!(error = %e, source, "failed to record notice");
                None
            }
        }
    }

    pub fn success(&self, source: &str, message: &str) -> Option<Notice> {
        self.record(NoticeLevel::Success, source, message)
    }

    pub fn error(&self, source: &str, err: &dyn std::fmt::Display) -> Option<Notice> {
        tracing::warn!(source, error = %err, "view failed");
        self.record(NoticeLevel::Error, source, &err.to_string())
    }

    pub fn since(&self, last_id: i64, limit: i64) -> rusqlite::Result<Vec<Notice>> {
        self.storage.notices_since(last_id, limit)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}
