use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Model served by Groq's hosted inference API.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Where the turn store lives when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "tmp/agent_storage.db";

pub const DEFAULT_CLINIC_NAME: &str = "Cavity Dental Clinic";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            db_path: Some(PathBuf::from(DEFAULT_DB_PATH)),
            clinic_name: Some(DEFAULT_CLINIC_NAME.to_string()),
        }
    }
}

impl Config {
    /// The effective model name after layering.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// The effective store path after layering.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    pub fn clinic_name(&self) -> &str {
        self.clinic_name.as_deref().unwrap_or(DEFAULT_CLINIC_NAME)
    }

    /// Summary safe for logging (no secrets).
    pub fn get_safe_summary(&self) -> SafeSummary {
        SafeSummary {
            api_key_configured: self.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            model: self.model.clone(),
            db_path: self.db_path.clone(),
        }
    }
}

#[derive(Debug)]
pub struct SafeSummary {
    pub api_key_configured: bool,
    pub model: Option<String>,
    pub db_path: Option<PathBuf>,
}
