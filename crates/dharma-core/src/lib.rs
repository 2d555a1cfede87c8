pub mod app_config;
pub mod catalog;
pub mod config;
pub mod slug;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LogFormat};
pub use catalog::{CenterRecord, RetreatDetails, RetreatRecord, TalkRecord, TeacherRecord};
pub use config::{load_app_config, load_app_config_from_env};
pub use slug::slugify;

/// Base URL of the Dharma Seed site that all catalog data is scraped from.
pub const DHARMA_SEED_BASE_URL: &str = "https://dharmaseed.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
