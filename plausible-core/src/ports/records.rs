// plausible-core/src/ports/records.rs

use crate::domain::project::AnalysisConfig;
use crate::domain::record::Record;
use crate::error::PlausibleError;

/// Where the dataset snapshot comes from. The engine only needs a finite,
/// unordered list of records.
pub trait RecordSource: Send + Sync {
    fn load(&self, config: &AnalysisConfig) -> Result<Vec<Record>, PlausibleError>;
}
