// plausible-core/src/domain/quality/mod.rs

pub mod convention;
pub mod issue;
pub mod outlier;
pub mod relational;
pub mod report;
pub mod severity;
pub mod statistics;
pub mod suspicious;

// Re-exports
pub use convention::ConventionValidator;
pub use issue::{Issue, IssueKind};
pub use outlier::{OutlierDetector, OutlierThresholds};
pub use relational::RelationalChecker;
pub use report::{
    AnalysisReport, ConventionViolation, FieldOutlier, FieldReport, IssueFilter, LocatedIssue,
    RecordReport, ReportSummary, sort_by_priority, verification_query,
};
pub use severity::{Severity, SeverityCounts};
pub use statistics::FieldStatistics;
pub use suspicious::{SiblingPair, SuspiciousPatternDetector, default_sibling_pairs};
