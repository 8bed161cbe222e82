// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};

use crate::domain::conventions::{ConventionRegistry, FieldConvention};
use crate::domain::error::DomainError;
use crate::domain::quality::{OutlierThresholds, SiblingPair, default_sibling_pairs};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,

    #[serde(rename = "records-path", default = "default_records_path")]
    pub records_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "ledger-path", default = "default_ledger_path")]
    pub ledger_path: String,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Knobs of one analysis pass.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_id_field")]
    pub id_field: String,

    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// Fields that must be present on every record. Distinct from the
    /// convention registry.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    #[serde(default)]
    pub outliers: OutlierThresholds,

    #[serde(default = "default_sibling_pairs")]
    pub sibling_pairs: Vec<SiblingPair>,

    /// Extra or overriding conventions, applied on top of the built-in table.
    #[serde(default)]
    pub conventions: Vec<FieldConvention>,
}

impl AnalysisConfig {
    pub fn registry(&self) -> Result<ConventionRegistry, DomainError> {
        let mut registry = ConventionRegistry::default();
        for convention in &self.conventions {
            registry.insert(convention.clone())?;
        }
        Ok(registry)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            name_field: default_name_field(),
            required_fields: default_required_fields(),
            outliers: OutlierThresholds::default(),
            sibling_pairs: default_sibling_pairs(),
            conventions: Vec::new(),
        }
    }
}

fn default_records_path() -> String {
    "data/towns.json".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_ledger_path() -> String {
    "plausible_ledger.duckdb".to_string()
}
fn default_id_field() -> String {
    "id".to_string()
}
fn default_name_field() -> String {
    "town_name".to_string()
}
pub fn default_required_fields() -> Vec<String> {
    [
        "town_name",
        "country",
        "region",
        "cost_of_living_usd",
        "healthcare_score",
        "safety_score",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
