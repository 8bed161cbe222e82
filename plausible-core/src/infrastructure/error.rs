// plausible-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(plausible::infra::database::duckdb),
        help("An error occurred inside the dismissal ledger database.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Ledger lock poisoned")]
    #[diagnostic(code(plausible::infra::database::poisoned))]
    Poisoned,

    #[error("Corrupted ledger row {id}: {reason}")]
    #[diagnostic(code(plausible::infra::database::corrupted))]
    CorruptedRow { id: i64, reason: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(plausible::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(plausible::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    // --- RECORDS / REPORT (JSON) ---
    #[error("JSON Error: {0}")]
    #[diagnostic(code(plausible::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(plausible::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(plausible::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Record source error: {0}")]
    #[diagnostic(
        code(plausible::infra::records),
        help("Records must be a JSON array of objects.")
    )]
    RecordSource(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
