// plausible-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PlausibleError {
    // --- DOMAIN ERRORS (review rules, conventions) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing, Ledger storage) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for PlausibleError {
    fn from(err: std::io::Error) -> Self {
        PlausibleError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for PlausibleError {
    fn from(err: duckdb::Error) -> Self {
        PlausibleError::Infrastructure(err.into())
    }
}
