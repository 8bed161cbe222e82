// plausible-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid dismissal: {0}")]
    #[diagnostic(
        code(plausible::domain::dismissal),
        help("A dismissal needs a record id, a reviewer and a non-empty comment.")
    )]
    InvalidDismissal(String),

    #[error("No active dismissal with id {0}")]
    #[diagnostic(
        code(plausible::domain::dismissal_not_found),
        help("Run `plausible dismissals` to list active dismissals.")
    )]
    DismissalNotFound(i64),

    #[error("Invalid convention: {0}")]
    #[diagnostic(
        code(plausible::domain::convention),
        help("Check min/max bounds in your conventions file.")
    )]
    InvalidConvention(String),

    #[error("Unknown severity '{0}'")]
    #[diagnostic(
        code(plausible::domain::severity),
        help("Expected one of: critical, high, medium, low.")
    )]
    UnknownSeverity(String),

    #[error("Unknown issue kind '{0}'")]
    #[diagnostic(code(plausible::domain::issue_kind))]
    UnknownIssueKind(String),
}
