// plausible-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::conventions::FieldConvention;
use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["plausible_project_conf.yaml", "plausible.yaml"];

pub const ENV_TARGET_PATH: &str = "PLAUSIBLE_TARGET_PATH";
pub const ENV_LEDGER_PATH: &str = "PLAUSIBLE_LEDGER_PATH";
pub const ENV_RECORDS_PATH: &str = "PLAUSIBLE_RECORDS_PATH";

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    load_project_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Loader with an injectable environment lookup.
pub fn load_project_config_with(
    project_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 2. Satellites
    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    // 3. Environment wins
    apply_env_overrides(&mut config, env);

    // Bad conventions fail at load time, not mid-analysis
    config
        .analysis
        .registry()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{} (checked: {:?})",
        root.display(),
        CONFIG_CANDIDATES
    )))
}

fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
    })
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let conventions_path = config_dir.join("conventions.yml");
    if conventions_path.exists() {
        #[derive(Deserialize)]
        struct ConventionsWrapper {
            conventions: Vec<FieldConvention>,
        }

        let wrapper: ConventionsWrapper = load_fragment(&conventions_path)?;
        info!(count = wrapper.conventions.len(), "  📏 Field conventions loaded");
        config.analysis.conventions.extend(wrapper.conventions);
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(val) = env(ENV_TARGET_PATH) {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = env(ENV_LEDGER_PATH) {
        info!(old = ?config.ledger_path, new = ?val, "Overriding ledger path via ENV");
        config.ledger_path = val;
    }
    if let Some(val) = env(ENV_RECORDS_PATH) {
        info!(old = ?config.records_path, new = ?val, "Overriding records path via ENV");
        config.records_path = val;
    }
}

/// Config paths resolved against the project directory. Absolute paths and
/// `:memory:` pass through.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub records: PathBuf,
    pub target: PathBuf,
    pub ledger: String,
}

impl ProjectPaths {
    pub fn resolve(project_dir: &Path, config: &ProjectConfig) -> Self {
        let ledger = if config.ledger_path == ":memory:" {
            config.ledger_path.clone()
        } else {
            project_dir.join(&config.ledger_path).display().to_string()
        };
        Self {
            records: project_dir.join(&config.records_path),
            target: project_dir.join(&config.target_path),
            ledger,
        }
    }
}
