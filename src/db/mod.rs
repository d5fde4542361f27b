pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::models::{Notice, NoticeLevel};

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Persistent key-value store for client-held state (session, theme, notices).
#[derive(Clone)]
pub struct LocalStorage {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStorage {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn get_item(&self, key: &str) -> rusqlite::Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        queries::get_item(&conn, key)
    }

    pub fn set_item(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        let conn = self.conn.lock().unwrap();
        queries::set_item(&conn, key, value)
    }

    pub fn remove_item(&self, key: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().unwrap();
        queries::remove_item(&conn, key)
    }

    pub fn insert_notice(
        &self,
        level: NoticeLevel,
        source: &str,
        message: &str,
    ) -> rusqlite::Result<Notice> {
        let conn = self.conn.lock().unwrap();
        queries::insert_notice(&conn, level, source, message)
    }

    pub fn notices_since(&self, last_id: i64, limit: i64) -> rusqlite::Result<Vec<Notice>> {
        let conn = self.conn.lock().unwrap();
        queries::get_notices_since(&conn, last_id, limit)
    }
}
