use crate::app::cli::Cli;
use crate::app::error::CollectError;
use crate::app::models::{CollectorConfig, InfluxDbConfig};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the token, so it can stay out of the
/// committed configuration document.
pub const TOKEN_ENV_VAR: &str = "COLLECTCTX_INFLUXDB_TOKEN";

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// The configuration document as written on disk. Unknown keys are ignored.
#[derive(Deserialize, Debug)]
struct ConfigFile {
    #[serde(default)]
    included_directories: Vec<String>,
    #[serde(default)]
    file_extensions: Vec<String>,
    #[serde(default)]
    exclude_files: Vec<String>,
    #[serde(default)]
    llm_instructions: Vec<String>,
    influxdb: Option<InfluxDbConfig>,
    #[serde(default)]
    strict_paths: bool,
}

/// Locate the configuration document: an explicit path must exist, otherwise
/// try the working directory, then the per-user config directory.
fn discover_config_path(cli_config: Option<&Path>) -> Result<PathBuf, CollectError> {
    if let Some(path) = cli_config {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(CollectError::Configuration(format!(
            "config file {} does not exist",
            path.display()
        )));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }

    if let Some(home) = dirs::home_dir() {
        let fallback = home
            .join(".config")
            .join("collectctx")
            .join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Ok(fallback);
        }
    }

    Err(CollectError::Configuration(format!(
        "no {} found in the working directory or under ~/.config/collectctx/",
        DEFAULT_CONFIG_FILE
    )))
}

/// The token may live in the environment instead of the committed document.
fn apply_token_override(influxdb: &mut Option<InfluxDbConfig>, token: Option<String>) {
    if let (Some(settings), Some(token)) = (influxdb.as_mut(), token) {
        settings.token = token;
    }
}

fn validate(config: &CollectorConfig) -> Result<(), CollectError> {
    if config.included_directories.is_empty() {
        return Err(CollectError::Configuration(
            "included_directories must list at least one directory".to_string(),
        ));
    }
    if config.file_extensions.is_empty() {
        return Err(CollectError::Configuration(
            "file_extensions must list at least one extension".to_string(),
        ));
    }
    if let Some(ext) = config.file_extensions.iter().find(|e| !e.starts_with('.')) {
        return Err(CollectError::Configuration(format!(
            "file extension {:?} must start with '.'",
            ext
        )));
    }
    Ok(())
}

pub fn resolve_config(cli: &Cli) -> Result<CollectorConfig, CollectError> {
    let path = discover_config_path(cli.config.as_deref())?;
    log::info!("Loading configuration from {}", path.display());

    let content =
        fs::read_to_string(&path).map_err(|e| CollectError::ConfigRead(path.clone(), e))?;
    let file: ConfigFile = serde_yaml::from_str(&content)?;

    let mut influxdb = file.influxdb;
    apply_token_override(&mut influxdb, env::var(TOKEN_ENV_VAR).ok());

    let config = CollectorConfig {
        included_directories: file.included_directories,
        file_extensions: file.file_extensions,
        exclude_files: file.exclude_files,
        llm_instructions: file.llm_instructions,
        influxdb,
        // The flag can only tighten the policy, never loosen it.
        strict: cli.strict || file.strict_paths,
    };

    validate(&config)?;
    Ok(config)
}
