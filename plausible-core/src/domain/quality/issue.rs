// plausible-core/src/domain/quality/issue.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::severity::Severity;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Physically impossible value
    Impossible,
    /// Outside the field's plausible range
    OutOfRange,
    /// Violates a data convention (e.g. integer scores)
    Convention,
    /// More than 3 standard deviations from the mean
    OutlierExtreme,
    /// Between 2 and 3 standard deviations from the mean
    OutlierModerate,
    /// Inconsistent with related fields of the same record
    Relational,
    /// Required field is missing
    MissingCritical,
    /// Looks like a data-entry artifact
    Suspicious,
}

impl IssueKind {
    pub const ALL: [IssueKind; 8] = [
        IssueKind::Impossible,
        IssueKind::OutOfRange,
        IssueKind::Convention,
        IssueKind::OutlierExtreme,
        IssueKind::OutlierModerate,
        IssueKind::Relational,
        IssueKind::MissingCritical,
        IssueKind::Suspicious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Impossible => "impossible",
            Self::OutOfRange => "out_of_range",
            Self::Convention => "convention",
            Self::OutlierExtreme => "outlier_extreme",
            Self::OutlierModerate => "outlier_moderate",
            Self::Relational => "relational",
            Self::MissingCritical => "missing_critical",
            Self::Suspicious => "suspicious",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IssueKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownIssueKind(s.to_string()))
    }
}

/// The atomic finding. Always bound to exactly one field; cross-field
/// findings name the other fields in `related_fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_fields: Vec<String>,
}

impl Issue {
    pub fn new(
        field: impl Into<String>,
        kind: IssueKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: None,
            kind,
            severity,
            message: message.into(),
            related_fields: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_related(mut self, fields: &[&str]) -> Self {
        self.related_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}
