pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use project::{ProjectPaths, load_project_config};
