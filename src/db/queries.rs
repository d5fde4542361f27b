use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Notice, NoticeLevel};

// ── Local storage ──

pub fn get_item(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_item(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO local_storage (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_item(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
    Ok(count > 0)
}

// ── Notices ──

pub fn insert_notice(
    conn: &Connection,
    level: NoticeLevel,
    source: &str,
    message: &str,
) -> rusqlite::Result<Notice> {
    conn.execute(
        "INSERT INTO notices (level, source, message) VALUES (?1, ?2, ?3)",
        params![level.as_str(), source, message],
    )?;
    let id = conn.last_insert_rowid();

    conn.query_row(
        "SELECT id, level, source, message, created_at FROM notices WHERE id = ?1",
        params![id],
        parse_notice_row,
    )
}

pub fn get_notices_since(
    conn: &Connection,
    last_id: i64,
    limit: i64,
) -> rusqlite::Result<Vec<Notice>> {
    let mut stmt = conn.prepare(
        "SELECT id, level, source, message, created_at
         FROM notices WHERE id > ?1 ORDER BY id ASC LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![last_id, limit], parse_notice_row)?;
    rows.collect()
}

fn parse_notice_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notice> {
    let level: String = row.get(1)?;
    Ok(Notice {
        id: row.get(0)?,
        level: NoticeLevel::parse(&level),
        source: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_set_get_remove_item() {
        let conn = db::init_db(":memory:").unwrap();

        assert_eq!(get_item(&conn, "k").unwrap(), None);
        set_item(&conn, "k", "one").unwrap();
        set_item(&conn, "k", "two").unwrap();
        assert_eq!(get_item(&conn, "k").unwrap().as_deref(), Some("two"));

        assert!(remove_item(&conn, "k").unwrap());
        assert!(!remove_item(&conn, "k").unwrap());
        assert_eq!(get_item(&conn, "k").unwrap(), None);
    }

    #[test]
    fn test_notices_since() {
        let conn = db::init_db(":memory:").unwrap();

        let first = insert_notice(&conn, NoticeLevel::Error, "schedule", "fetch failed").unwrap();
        let second = insert_notice(&conn, NoticeLevel::Success, "create", "created").unwrap();
        assert!(second.id > first.id);

        let all = get_notices_since(&conn, 0, 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].level, NoticeLevel::Error);

        let newer = get_notices_since(&conn, first.id, 10).unwrap();
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].source, "create");
    }
}
