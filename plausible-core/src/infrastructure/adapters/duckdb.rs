// plausible-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{Config, Connection, params};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::quality::IssueKind;
use crate::domain::review::{DismissalRecord, NewDismissal};
use crate::error::PlausibleError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::ledger::{DismissalLedger, LedgerWrite};

const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS dismissal_seq START 1;
CREATE TABLE IF NOT EXISTS dismissals (
    id BIGINT PRIMARY KEY DEFAULT nextval('dismissal_seq'),
    record_id VARCHAR NOT NULL,
    field_name VARCHAR NOT NULL,
    issue_kind VARCHAR NOT NULL,
    comment VARCHAR NOT NULL,
    reviewer_id VARCHAR NOT NULL,
    decided_at VARCHAR NOT NULL,
    revoked_at VARCHAR,
    issue_message VARCHAR,
    dismissed_value DOUBLE
);
";

const COLUMNS: &str = "id, record_id, field_name, issue_kind, comment, reviewer_id, \
                       decided_at, revoked_at, issue_message, dismissed_value";

/// Dismissal ledger persisted in a DuckDB file (or `:memory:`).
///
/// DuckDB has no partial unique index, so "one active row per key" is a
/// check-then-insert under the connection lock. A DuckDB file accepts a
/// single read-write process, which makes the lock sufficient.
pub struct DuckDBLedger {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBLedger {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        conn.execute_batch(SCHEMA)?;
        debug!(path = db_path, "Dismissal ledger ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PlausibleError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }

    fn fetch(conn: &Connection, id: i64) -> Result<DismissalRecord, PlausibleError> {
        let raw = conn.query_row(
            &format!("SELECT {COLUMNS} FROM dismissals WHERE id = ?"),
            params![id],
            RawRow::from_row,
        )?;
        Ok(raw.into_record().map_err(InfrastructureError::from)?)
    }
}

/// Row as stored; converted to domain types outside the driver callback so a
/// bad value surfaces as `CorruptedRow` instead of a driver error.
struct RawRow {
    id: i64,
    record_id: String,
    field_name: String,
    issue_kind: String,
    comment: String,
    reviewer_id: String,
    decided_at: String,
    revoked_at: Option<String>,
    issue_message: Option<String>,
    dismissed_value: Option<f64>,
}

impl RawRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            record_id: row.get(1)?,
            field_name: row.get(2)?,
            issue_kind: row.get(3)?,
            comment: row.get(4)?,
            reviewer_id: row.get(5)?,
            decided_at: row.get(6)?,
            revoked_at: row.get(7)?,
            issue_message: row.get(8)?,
            dismissed_value: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<DismissalRecord, DatabaseError> {
        let id = self.id;
        let corrupted = |reason: String| DatabaseError::CorruptedRow { id, reason };
        let timestamp = |text: &str| {
            DateTime::parse_from_rfc3339(text)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| corrupted(format!("bad timestamp '{text}': {e}")))
        };

        Ok(DismissalRecord {
            id,
            issue_kind: self
                .issue_kind
                .parse::<IssueKind>()
                .map_err(|e| corrupted(e.to_string()))?,
            decided_at: timestamp(&self.decided_at)?,
            revoked_at: self.revoked_at.as_deref().map(timestamp).transpose()?,
            record_id: self.record_id,
            field_name: self.field_name,
            comment: self.comment,
            reviewer_id: self.reviewer_id,
            issue_message: self.issue_message,
            dismissed_value: self.dismissed_value,
        })
    }
}

#[async_trait]
impl DismissalLedger for DuckDBLedger {
    #[instrument(skip_all, fields(record = %dismissal.record_id, field = %dismissal.field_name))]
    async fn record(&self, dismissal: NewDismissal) -> Result<LedgerWrite, PlausibleError> {
        dismissal.check()?;
        let conn = self.lock()?;

        let active: i64 = conn.query_row(
            "SELECT COUNT(*) FROM dismissals \
             WHERE record_id = ? AND field_name = ? AND issue_kind = ? AND revoked_at IS NULL",
            params![
                dismissal.record_id,
                dismissal.field_name,
                dismissal.issue_kind.as_str()
            ],
            |row| row.get(0),
        )?;
        if active > 0 {
            debug!("Active dismissal already present");
            return Ok(LedgerWrite::Conflict);
        }

        let decided_at = Utc::now();
        let id: i64 = conn.query_row(
            "INSERT INTO dismissals (record_id, field_name, issue_kind, comment, reviewer_id, \
             decided_at, issue_message, dismissed_value) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            params![
                dismissal.record_id,
                dismissal.field_name,
                dismissal.issue_kind.as_str(),
                dismissal.comment,
                dismissal.reviewer_id,
                decided_at.to_rfc3339(),
                dismissal.issue_message,
                dismissal.dismissed_value
            ],
            |row| row.get(0),
        )?;

        Ok(LedgerWrite::Recorded(DismissalRecord::from_new(
            id, dismissal, decided_at,
        )))
    }

    async fn list_active(&self) -> Result<Vec<DismissalRecord>, PlausibleError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM dismissals WHERE revoked_at IS NULL ORDER BY id"
        ))?;
        let rows = stmt.query_map([], RawRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record().map_err(InfrastructureError::from)?);
        }
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn revoke(&self, dismissal_id: i64) -> Result<DismissalRecord, PlausibleError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE dismissals SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
            params![Utc::now().to_rfc3339(), dismissal_id],
        )?;
        if changed == 0 {
            return Err(DomainError::DismissalNotFound(dismissal_id).into());
        }
        Self::fetch(&conn, dismissal_id)
    }
}
