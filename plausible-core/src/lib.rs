// plausible-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the collaborators we do not own (dismissal ledger).
pub mod ports;

// 2. Domain (Business core)
// Records, conventions, checks, report model.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB ledger, JSON record source, config files.
// Depends on Domain and Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Analysis pass and review workflow.
// Depends on Domain, Infra and Ports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use plausible_core::PlausibleError;
pub use error::PlausibleError;
