pub mod duckdb;
pub mod json_source;
pub mod memory;

pub use self::duckdb::DuckDBLedger;
pub use json_source::JsonRecordSource;
pub use memory::InMemoryLedger;
