pub mod conventions;
pub mod error;
pub mod project;
pub mod quality;
pub mod record;
pub mod review;

// Handy re-exports to keep imports short elsewhere
pub use conventions::{ConventionRegistry, FieldConvention, ValueKind};
pub use error::DomainError;
pub use record::{FieldValue, Record};
