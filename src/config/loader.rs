use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::schema::Config;

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
static CONFIG_TEST_ENV_LOCK: Mutex<()> = Mutex::new(());

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file contains invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Layered configuration load: defaults, then file, then environment,
/// then CLI flags.
pub fn load_config(
    cli_model: Option<String>,
    cli_db_path: Option<PathBuf>,
    cli_config_path: Option<PathBuf>,
) -> Result<Config> {
    tracing::debug!("Loading configuration");

    let mut config = Config::default();

    // Layer 1: config file (~/.frontdesk/config.json)
    let config_file = cli_config_path.clone().or_else(get_default_config_path);

    if let Some(ref path) = config_file {
        if path.exists() {
            tracing::debug!(config_path = %path.display(), "Loading configuration from file");
            config = merge_config_from_file(config, path)?;
        } else {
            tracing::debug!(config_path = %path.display(), "Config file not found, using defaults");
        }
    }

    // Layer 2: environment variables
    config = merge_env_variables(config);

    // Layer 3: CLI flags (highest precedence)
    if let Some(model) = cli_model {
        tracing::debug!(model = %model, "Applying CLI model override");
        config.model = Some(model);
    }
    if let Some(db_path) = cli_db_path {
        tracing::debug!(db_path = %db_path.display(), "Applying CLI db path override");
        config.db_path = Some(db_path);
    }

    let summary = config.get_safe_summary();
    tracing::debug!(
        api_key_configured = summary.api_key_configured,
        model = ?summary.model,
        db_path = ?summary.db_path,
        "Configuration loaded successfully"
    );

    Ok(config)
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".frontdesk").join("config.json"))
}

fn merge_config_from_file(config: Config, path: &PathBuf) -> Result<Config> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(config),
        Err(e) => return Err(e).context("Failed to read metadata for config file"),
    };

    let mode = metadata.permissions().mode() & 0o777;
    if mode != 0o600 {
        tracing::error!(
            "Config file {:?} has permissions {:o}, expected 0600 - skipping for security",
            path,
            mode
        );
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let file_config: Config = serde_json::from_str(&content).map_err(ConfigError::InvalidJson)?;

    Ok(Config {
        api_key: file_config.api_key.or(config.api_key),
        model: file_config.model.or(config.model),
        db_path: file_config.db_path.or(config.db_path),
        clinic_name: file_config.clinic_name.or(config.clinic_name),
    })
}

fn merge_env_variables(config: Config) -> Config {
    Config {
        api_key: std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or(config.api_key),
        model: std::env::var("FRONTDESK_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .or(config.model),
        db_path: std::env::var("FRONTDESK_DB")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or(config.db_path),
        clinic_name: config.clinic_name,
    }
}

pub fn save_config(config: &Config, path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(config)?;

    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create config file: {:?}", path))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    // 0600: the file may hold the API key
    let mut permissions = file.metadata()?.permissions();
    permissions.set_mode(0o600);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("Failed to set permissions on config file: {:?}", path))?;

    tracing::info!("Configuration saved to {:?}", path);
    Ok(())
}

pub fn get_config_path() -> Option<PathBuf> {
    get_default_config_path()
}
