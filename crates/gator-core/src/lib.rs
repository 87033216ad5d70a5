//! Shared domain types, configuration, and the storage contract for gator.

pub mod app_config;
pub mod config;
pub mod interval;
pub mod settings;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use interval::PollInterval;
pub use settings::Settings;
pub use store::{Feed, FeedStore, NewPost, StoreError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid poll interval \"{input}\": {reason}")]
    InvalidInterval { input: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
