// plausible-core/src/application/mod.rs

pub mod analyzer;
pub mod review;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use plausible_core::application::{DataQualityAnalyzer, ReviewService};`

pub use analyzer::DataQualityAnalyzer;
pub use review::{DismissOutcome, ResolutionIndex, ReviewService, ReviewView};
