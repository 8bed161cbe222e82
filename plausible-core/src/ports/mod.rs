// plausible-core/src/ports/mod.rs

pub mod ledger;
pub mod records;

pub use ledger::{DismissalLedger, LedgerWrite};
pub use records::RecordSource;
