//! Shared domain types and configuration for the CropSage client.

pub mod app_config;
pub mod config;
pub mod language;
pub mod records;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use language::Language;
pub use records::{Coordinates, DiagnosisResult, Problem, StoreRecord, NEARBY_RADIUS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unsupported language: {0} (expected one of en, hi, mr)")]
    UnknownLanguage(String),
}
