// plausible-core/src/domain/quality/severity.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

// Discriminants ascend with gravity, so `Severity::Low < Severity::Critical`
// and sorting/filtering can use plain comparison operators.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,      // 0
    Medium,   // 1
    High,     // 2
    Critical, // 3
}

impl Severity {
    /// Most severe first, the order used by reports.
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Per-severity tally, serialized as `{critical, high, medium, low}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);

        let mut all = vec![Severity::Medium, Severity::Critical, Severity::Low, Severity::High];
        all.sort_by(|a, b| b.cmp(a));
        assert_eq!(all, Severity::DESCENDING.to_vec());
    }

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        for severity in Severity::DESCENDING {
            assert_eq!(Severity::from_str(&severity.to_string())?, severity);
        }
        assert_eq!(Severity::from_str("HIGH")?, Severity::High);
        assert!(matches!(
            Severity::from_str("error"),
            Err(DomainError::UnknownSeverity(_))
        ));
        Ok(())
    }

    #[test]
    fn test_counts() {
        let mut counts = SeverityCounts::default();
        counts.add(Severity::High);
        counts.add(Severity::High);
        counts.add(Severity::Low);
        assert_eq!(counts.get(Severity::High), 2);
        assert_eq!(counts.get(Severity::Critical), 0);
        assert_eq!(counts.total(), 3);
    }
}
