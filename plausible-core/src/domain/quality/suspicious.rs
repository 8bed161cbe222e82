// plausible-core/src/domain/quality/suspicious.rs

use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind};
use super::severity::Severity;
use crate::domain::conventions::{ConventionRegistry, ValueKind};
use crate::domain::record::{FieldValue, Record};

/// Two size variants of the same measure (1-bedroom / 2-bedroom rent...).
/// Identical values usually mean one was copied into the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingPair(pub String, pub String);

impl SiblingPair {
    pub fn new(first: &str, second: &str) -> Self {
        Self(first.to_string(), second.to_string())
    }
}

pub fn default_sibling_pairs() -> Vec<SiblingPair> {
    vec![SiblingPair::new("rent_1bed", "rent_2bed")]
}

pub struct SuspiciousPatternDetector<'a> {
    registry: &'a ConventionRegistry,
    siblings: &'a [SiblingPair],
}

impl<'a> SuspiciousPatternDetector<'a> {
    pub fn new(registry: &'a ConventionRegistry, siblings: &'a [SiblingPair]) -> Self {
        Self { registry, siblings }
    }

    pub fn detect(&self, record: &Record, field_name: &str, value: &FieldValue) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(number) = value.as_number() else {
            return issues;
        };

        let is_cost = self
            .registry
            .get(field_name)
            .is_some_and(|c| c.value_kind == ValueKind::Cost);
        if is_cost && number >= 1000.0 && number % 1000.0 == 0.0 {
            issues.push(
                Issue::new(
                    field_name,
                    IssueKind::Suspicious,
                    Severity::Low,
                    format!("Suspiciously round number: {number} (might be estimate)"),
                )
                .with_value(number),
            );
        }

        for SiblingPair(first, second) in self.siblings.iter().filter(|p| p.0 == field_name) {
            if record.number(second) == Some(number) {
                issues.push(
                    Issue::new(
                        first.as_str(),
                        IssueKind::Suspicious,
                        Severity::Medium,
                        format!("{first} and {second} are identical ({number}) - likely copy error"),
                    )
                    .with_value(number)
                    .with_related(&[first.as_str(), second.as_str()]),
                );
            }
        }

        issues
    }
}
