//! Layered configuration: defaults, config file, environment, CLI flags.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{Config, DEFAULT_CLINIC_NAME, DEFAULT_DB_PATH, DEFAULT_MODEL};
