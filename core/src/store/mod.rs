//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Engine components reach it through the traits in `repository` and
//! never execute SQL directly.

use rusqlite::Connection;

use crate::error::EngineResult;

mod alert;
mod risk_score;
mod staff;
mod work_hours;

pub struct BurnoutStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl BurnoutStore {
    pub fn open(path: &str) -> EngineResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_staff.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_work_hours.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_risk_score.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_alert.sql"))?;
        Ok(())
    }

    /// Row counts per table, for diagnostics.
    pub fn table_counts(&self) -> EngineResult<Vec<(&'static str, i64)>> {
        let mut counts = Vec::new();
        for (table, sql) in [
            ("staff", "SELECT COUNT(*) FROM staff"),
            ("work_hours", "SELECT COUNT(*) FROM work_hours"),
            ("risk_score", "SELECT COUNT(*) FROM risk_score"),
            ("alert", "SELECT COUNT(*) FROM alert"),
        ] {
            let count: i64 = self.conn.query_row(sql, [], |r| r.get(0))?;
            counts.push((table, count));
        }
        Ok(counts)
    }
}
