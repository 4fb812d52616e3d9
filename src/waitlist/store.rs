//! Waitlist Storage
//! Mission: Persist waitlist entries and admin credentials with SQLite
//!
//! Both tables carry a UNIQUE email column. A constraint violation on insert is
//! reported as [`InsertOutcome::Duplicate`], which closes the lookup-then-insert
//! race between concurrent signups for the same address.

use crate::{auth::models::AdminCredential, waitlist::models::WaitlistEntry};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS waitlist (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    timestamp INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS admins (
    email TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#;

/// Whether an insert created a row or hit an existing email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// SQLite-backed store shared by every request
#[derive(Clone)]
pub struct WaitlistStore {
    conn: Arc<Mutex<Connection>>,
}

impl WaitlistStore {
    /// Open (or create) the database file and apply the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;
        let store = Self::from_connection(conn)?;
        info!("📋 Waitlist database initialized at: {}", db_path);
        Ok(store)
    }

    /// Private in-memory database, used by tests and local runs
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn find_waitlist_by_email(&self, email: &str) -> Result<Option<WaitlistEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(
            "SELECT id, email, timestamp FROM waitlist WHERE email = ?1 LIMIT 1",
        )?;

        let entry = stmt
            .query_row(params![email], |row| {
                Ok(WaitlistEntry {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })
            .optional()
            .context("Failed to look up waitlist entry")?;

        Ok(entry)
    }

    pub async fn insert_waitlist(&self, entry: &WaitlistEntry) -> Result<InsertOutcome> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO waitlist (id, email, timestamp) VALUES (?1, ?2, ?3)",
            params![entry.id, entry.email, entry.timestamp],
        );

        match result {
            Ok(_) => {
                debug!("Inserted waitlist entry {}", entry.id);
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Waitlist insert hit existing email");
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e).context("Failed to insert waitlist entry"),
        }
    }

    /// All entries in signup order
    pub async fn list_waitlist(&self) -> Result<Vec<WaitlistEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare_cached("SELECT id, email, timestamp FROM waitlist ORDER BY seq ASC")?;

        let entries = stmt
            .query_map([], |row| {
                Ok(WaitlistEntry {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read waitlist")?;

        Ok(entries)
    }

    pub async fn delete_waitlist_by_email(&self, email: &str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let deleted = conn
            .execute("DELETE FROM waitlist WHERE email = ?1", params![email])
            .context("Failed to delete waitlist entry")?;
        Ok(deleted)
    }

    pub async fn count_waitlist(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count = conn
            .query_row("SELECT COUNT(*) FROM waitlist", [], |row| row.get(0))
            .context("Failed to count waitlist")?;
        Ok(count)
    }

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminCredential>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached("SELECT email, password_hash FROM admins WHERE email = ?1 LIMIT 1")?;

        let admin = stmt
            .query_row(params![email], |row| {
                Ok(AdminCredential {
                    email: row.get(0)?,
                    password_hash: row.get(1)?,
                })
            })
            .optional()
            .context("Failed to look up admin")?;

        Ok(admin)
    }

    pub async fn insert_admin(&self, admin: &AdminCredential) -> Result<InsertOutcome> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO admins (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![admin.email, admin.password_hash, Utc::now().timestamp()],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => {
                warn!("Admin insert hit existing email");
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e).context("Failed to insert admin"),
        }
    }
}

#[cfg(test)]
impl WaitlistStore {
    /// Shared connection handle, for tests that need to hold the lock
    pub(crate) fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
