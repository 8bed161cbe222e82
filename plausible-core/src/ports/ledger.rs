// plausible-core/src/ports/ledger.rs

// What the review workflow needs from storage, without knowing which
// database holds the rows. The ledger is shared between reviewers; it alone
// enforces "at most one active dismissal per issue key".

use crate::domain::review::{DismissalRecord, NewDismissal};
use crate::error::PlausibleError;
use async_trait::async_trait;

/// Result of a dismissal write.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerWrite {
    Recorded(DismissalRecord),
    /// An active dismissal already exists for the same key (someone else
    /// got there first). Not an error.
    Conflict,
}

#[async_trait]
pub trait DismissalLedger: Send + Sync {
    async fn record(&self, dismissal: NewDismissal) -> Result<LedgerWrite, PlausibleError>;

    async fn list_active(&self) -> Result<Vec<DismissalRecord>, PlausibleError>;

    /// Stamps `revoked_at` on an active dismissal and returns it.
    /// Fails with `DomainError::DismissalNotFound` when no active row has
    /// this id.
    async fn revoke(&self, dismissal_id: i64) -> Result<DismissalRecord, PlausibleError>;
}
