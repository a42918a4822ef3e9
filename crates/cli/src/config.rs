use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::types::Cost;

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    pub cost_min: Cost,
    pub cost_max: Cost,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverConfig {
    pub max_tsp_vertices: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

/// Loads `crates/cli/Config.toml` (relative to the working directory) and
/// environment overrides.
pub fn load_config() -> Result<Config, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    let config_file_path: PathBuf = base_path.join("crates").join("cli").join("Config.toml");

    load_config_from(&config_file_path)
}

/// Loads configuration from an explicit file, then applies `COST_GRAPH_*`
/// environment overrides (nested keys separated by `__`, e.g.
/// `COST_GRAPH_SOLVER__MAX_TSP_VERTICES=12`).
pub fn load_config_from(config_file_path: &Path) -> Result<Config, Error> {
    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path).required(true))
        .add_source(
            Environment::with_prefix("COST_GRAPH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.generator.cost_min > app_config.generator.cost_max {
        return Err(Error::ConfigLoadError(format!(
            "generator.cost_min ({}) exceeds generator.cost_max ({})",
            app_config.generator.cost_min, app_config.generator.cost_max
        )));
    }

    Ok(app_config)
}
