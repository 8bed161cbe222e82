// plausible-core/src/domain/review.rs
//
// Reviewer decisions. A dismissal suppresses one issue of one record from
// the "active" view without touching the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::quality::{Issue, IssueKind};

/// Identity of an issue across analysis passes. Writes and lookups must use
/// the same triple, otherwise a dismissal silently stops matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DismissalKey {
    pub record_id: String,
    pub field: String,
    pub kind: IssueKind,
}

impl DismissalKey {
    pub fn new(record_id: &str, field: &str, kind: IssueKind) -> Self {
        Self {
            record_id: record_id.to_string(),
            field: field.to_string(),
            kind,
        }
    }

    pub fn for_issue(record_id: &str, issue: &Issue) -> Self {
        Self::new(record_id, &issue.field, issue.kind)
    }
}

/// A reviewer's request to dismiss an issue, before the ledger assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewDismissal {
    #[validate(length(min = 1, message = "Record id is required"))]
    pub record_id: String,
    #[validate(length(min = 1, message = "Field name is required"))]
    pub field_name: String,
    pub issue_kind: IssueKind,
    #[validate(length(min = 1, message = "Dismissal comment is required"))]
    pub comment: String,
    #[validate(length(min = 1, message = "Reviewer is required"))]
    pub reviewer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_value: Option<f64>,
}

impl NewDismissal {
    /// Dismissal of `issue` as it appears for `record_id`. Comment and
    /// reviewer are trimmed, then the whole request is validated.
    pub fn for_issue(
        record_id: &str,
        issue: &Issue,
        comment: &str,
        reviewer_id: &str,
    ) -> Result<Self, DomainError> {
        let dismissal = Self {
            record_id: record_id.trim().to_string(),
            field_name: issue.field.clone(),
            issue_kind: issue.kind,
            comment: comment.trim().to_string(),
            reviewer_id: reviewer_id.trim().to_string(),
            issue_message: Some(issue.message.clone()),
            dismissed_value: issue.value,
        };
        dismissal.check()?;
        Ok(dismissal)
    }

    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidDismissal(e.to_string()))
    }

    pub fn key(&self) -> DismissalKey {
        DismissalKey::new(&self.record_id, &self.field_name, self.issue_kind)
    }
}

/// Ledger row. Append-only: revocation stamps `revoked_at` instead of
/// deleting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DismissalRecord {
    pub id: i64,
    pub record_id: String,
    pub field_name: String,
    pub issue_kind: IssueKind,
    pub comment: String,
    pub reviewer_id: String,
    pub decided_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_value: Option<f64>,
}

impl DismissalRecord {
    pub fn from_new(id: i64, new: NewDismissal, decided_at: DateTime<Utc>) -> Self {
        Self {
            id,
            record_id: new.record_id,
            field_name: new.field_name,
            issue_kind: new.issue_kind,
            comment: new.comment,
            reviewer_id: new.reviewer_id,
            decided_at,
            revoked_at: None,
            issue_message: new.issue_message,
            dismissed_value: new.dismissed_value,
        }
    }

    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    pub fn key(&self) -> DismissalKey {
        DismissalKey::new(&self.record_id, &self.field_name, self.issue_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::Severity;

    fn issue() -> Issue {
        Issue::new(
            "avg_temp_winter",
            IssueKind::Relational,
            Severity::Critical,
            "Winter temp (26°C) higher than summer (25°C)",
        )
        .with_value(26.0)
    }

    #[test]
    fn test_new_dismissal_trims_and_keys_on_kind() -> anyhow::Result<()> {
        let d = NewDismissal::for_issue(
            "42",
            &issue(),
            "  Equatorial town, flat seasons  ",
            " reviewer@example.com ",
        )?;
        assert_eq!(d.comment, "Equatorial town, flat seasons");
        assert_eq!(d.reviewer_id, "reviewer@example.com");
        assert_eq!(d.dismissed_value, Some(26.0));
        assert_eq!(
            d.key(),
            DismissalKey::new("42", "avg_temp_winter", IssueKind::Relational)
        );
        Ok(())
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let res = NewDismissal::for_issue("42", &issue(), "   ", "reviewer");
        assert!(matches!(res, Err(DomainError::InvalidDismissal(_))));

        let res = NewDismissal::for_issue("", &issue(), "ok", "reviewer");
        assert!(res.is_err());

        let res = NewDismissal::for_issue("42", &issue(), "ok", "");
        assert!(res.is_err());
    }

    #[test]
    fn test_record_key_matches_issue_key() -> anyhow::Result<()> {
        let new = NewDismissal::for_issue("42", &issue(), "fine", "me")?;
        let record = DismissalRecord::from_new(1, new, Utc::now());
        assert!(record.is_active());
        assert_eq!(record.key(), DismissalKey::for_issue("42", &issue()));
        Ok(())
    }
}
