// plausible-core/src/application/review.rs
//
// USE CASE: human review of reported issues.
// Dismissals live in the ledger; the report itself is never mutated.

use std::collections::HashSet;
use tracing::{info, instrument};

use crate::domain::quality::{AnalysisReport, Issue, RecordReport};
use crate::domain::review::{DismissalKey, DismissalRecord, NewDismissal};
use crate::error::PlausibleError;
use crate::ports::ledger::{DismissalLedger, LedgerWrite};

/// Lookup of active dismissals by issue key.
#[derive(Debug, Default, Clone)]
pub struct ResolutionIndex {
    keys: HashSet<DismissalKey>,
}

impl ResolutionIndex {
    pub fn from_active(dismissals: &[DismissalRecord]) -> Self {
        Self {
            keys: dismissals
                .iter()
                .filter(|d| d.is_active())
                .map(DismissalRecord::key)
                .collect(),
        }
    }

    pub fn is_resolved(&self, record_id: &str, issue: &Issue) -> bool {
        self.keys.contains(&DismissalKey::for_issue(record_id, issue))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Partitions every record's issues into still-open and dismissed.
    /// Records keep their report order on both sides.
    pub fn split(&self, report: &AnalysisReport) -> ReviewView {
        let mut view = ReviewView::default();
        for record in &report.record_reports {
            let id = record.record_id.as_str();
            view.active
                .extend(record.retain(|issue| !self.is_resolved(id, issue)));
            view.resolved
                .extend(record.retain(|issue| self.is_resolved(id, issue)));
        }
        view
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReviewView {
    pub active: Vec<RecordReport>,
    pub resolved: Vec<RecordReport>,
}

impl ReviewView {
    pub fn active_issue_count(&self) -> usize {
        self.active.iter().map(|r| r.issues.len()).sum()
    }

    pub fn resolved_issue_count(&self) -> usize {
        self.resolved.iter().map(|r| r.issues.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DismissOutcome {
    Dismissed(DismissalRecord),
    /// Another reviewer already dismissed the same issue.
    AlreadyResolved,
}

pub struct ReviewService<L: DismissalLedger> {
    ledger: L,
}

impl<L: DismissalLedger> ReviewService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[instrument(skip_all, fields(record = %record.record_id, field = %issue.field, kind = %issue.kind))]
    pub async fn dismiss(
        &self,
        record: &RecordReport,
        issue: &Issue,
        comment: &str,
        reviewer_id: &str,
    ) -> Result<DismissOutcome, PlausibleError> {
        let request = NewDismissal::for_issue(&record.record_id, issue, comment, reviewer_id)?;
        self.submit(request).await
    }

    /// Records an already built request. Used when the caller only knows the
    /// issue key (e.g. from the command line).
    pub async fn submit(&self, request: NewDismissal) -> Result<DismissOutcome, PlausibleError> {
        request.check()?;
        match self.ledger.record(request).await? {
            LedgerWrite::Recorded(row) => {
                info!(id = row.id, reviewer = %row.reviewer_id, "Issue dismissed");
                Ok(DismissOutcome::Dismissed(row))
            }
            LedgerWrite::Conflict => {
                info!("Issue already dismissed by another reviewer");
                Ok(DismissOutcome::AlreadyResolved)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn revoke(&self, dismissal_id: i64) -> Result<DismissalRecord, PlausibleError> {
        let row = self.ledger.revoke(dismissal_id).await?;
        info!(record = %row.record_id, field = %row.field_name, "Dismissal revoked");
        Ok(row)
    }

    pub async fn active_dismissals(&self) -> Result<Vec<DismissalRecord>, PlausibleError> {
        self.ledger.list_active().await
    }

    pub async fn resolution_index(&self) -> Result<ResolutionIndex, PlausibleError> {
        Ok(ResolutionIndex::from_active(&self.active_dismissals().await?))
    }

    /// The report as reviewers see it: dismissed issues hidden, records left
    /// without any open issue dropped.
    pub async fn unresolved(&self, report: &AnalysisReport) -> Result<Vec<RecordReport>, PlausibleError> {
        Ok(self.resolution_index().await?.split(report).active)
    }
}
