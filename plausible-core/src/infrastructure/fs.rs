// plausible-core/src/infrastructure/fs.rs

use crate::domain::quality::AnalysisReport;
use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "verification_report.json";

/// Replace `path` with `content` through a sibling temp file, so readers see
/// either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.persist(path).map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Writes `<target_dir>/verification_report.json`, creating the directory.
pub fn write_report(target_dir: &Path, report: &AnalysisReport) -> Result<PathBuf, InfrastructureError> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(REPORT_FILE);
    atomic_write(&path, report.to_json()?)?;
    info!(path = %path.display(), "Report written");
    Ok(path)
}

/// Loads a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<AnalysisReport, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::analyzer::DataQualityAnalyzer;
    use crate::domain::record::Record;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_replaces_content() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("out.json");

        atomic_write(&file_path, "[]")?;
        atomic_write(&file_path, "[1]")?;

        assert_eq!(fs::read_to_string(&file_path)?, "[1]");
        // No temp file left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_report_round_trips_through_target_dir() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("target").join("nested");
        let towns = [Record::new("t1", "Lagos").with("healthcare_score", 42.0)];
        let report = DataQualityAnalyzer::default().analyze(&towns);

        let path = write_report(&target, &report)?;
        assert!(path.ends_with(REPORT_FILE));

        let loaded = read_report(&path)?;
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.record_reports, report.record_reports);
        Ok(())
    }
}
