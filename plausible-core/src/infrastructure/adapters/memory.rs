// plausible-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::domain::error::DomainError;
use crate::domain::review::{DismissalRecord, NewDismissal};
use crate::error::PlausibleError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::ledger::{DismissalLedger, LedgerWrite};

/// Process-local ledger. Used by tests and by dry runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    rows: Mutex<Vec<DismissalRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<DismissalRecord>>, PlausibleError> {
        self.rows
            .lock()
            .map_err(|_| PlausibleError::Infrastructure(InfrastructureError::Database(DatabaseError::Poisoned)))
    }
}

#[async_trait]
impl DismissalLedger for InMemoryLedger {
    async fn record(&self, dismissal: NewDismissal) -> Result<LedgerWrite, PlausibleError> {
        dismissal.check()?;
        let key = dismissal.key();
        let mut rows = self.rows()?;
        if rows.iter().any(|r| r.is_active() && r.key() == key) {
            return Ok(LedgerWrite::Conflict);
        }
        let id = rows.last().map_or(1, |r| r.id + 1);
        let row = DismissalRecord::from_new(id, dismissal, Utc::now());
        rows.push(row.clone());
        Ok(LedgerWrite::Recorded(row))
    }

    async fn list_active(&self) -> Result<Vec<DismissalRecord>, PlausibleError> {
        Ok(self.rows()?.iter().filter(|r| r.is_active()).cloned().collect())
    }

    async fn revoke(&self, dismissal_id: i64) -> Result<DismissalRecord, PlausibleError> {
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|r| r.id == dismissal_id && r.is_active())
            .ok_or(DomainError::DismissalNotFound(dismissal_id))?;
        row.revoked_at = Some(Utc::now());
        Ok(row.clone())
    }
}
