// plausible/src/commands/mod.rs

pub mod analyze;
pub mod dismiss;
pub mod dismissals;
pub mod revoke;

use anyhow::Context;
use std::path::{Path, PathBuf};

use plausible_core::application::{DataQualityAnalyzer, ReviewService};
use plausible_core::domain::quality::AnalysisReport;
use plausible_core::domain::record::Record;
use plausible_core::infrastructure::adapters::{DuckDBLedger, JsonRecordSource};
use plausible_core::infrastructure::config::{ProjectConfig, ProjectPaths, load_project_config};
use plausible_core::ports::RecordSource;

/// Loaded configuration plus resolved paths, shared by every subcommand.
pub struct Project {
    pub config: ProjectConfig,
    pub paths: ProjectPaths,
}

impl Project {
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;
        let paths = ProjectPaths::resolve(project_dir, &config);
        Ok(Self { config, paths })
    }

    pub fn with_records(mut self, records: Option<PathBuf>) -> Self {
        if let Some(path) = records {
            self.paths.records = path;
        }
        self
    }

    pub fn load_records(&self) -> anyhow::Result<Vec<Record>> {
        JsonRecordSource::new(&self.paths.records)
            .load(&self.config.analysis)
            .with_context(|| format!("Failed to load records from {:?}", self.paths.records))
    }

    pub fn analyze(&self) -> anyhow::Result<AnalysisReport> {
        let records = self.load_records()?;
        let analyzer = DataQualityAnalyzer::new(&self.config.analysis)
            .context("Invalid field conventions")?;
        Ok(analyzer.analyze(&records))
    }

    pub fn review_service(&self) -> anyhow::Result<ReviewService<DuckDBLedger>> {
        let ledger = DuckDBLedger::new(&self.paths.ledger)
            .with_context(|| format!("Failed to open dismissal ledger at {}", self.paths.ledger))?;
        Ok(ReviewService::new(ledger))
    }
}

/// Cuts `text` to `max` characters for table cells.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Winter temp higher", 7), "Winter…");
        assert_eq!(truncate("°C°C°C", 3), "°C…");
    }
}
