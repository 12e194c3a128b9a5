use thiserror::Error;

use super::{BuildError, ConfigError, KeyValError, PatternError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Key-value parse error: {0}")]
    KeyVal(#[from] KeyValError),
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("Request build error: {0}")]
    Build(#[from] BuildError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn pattern<E>(error: E) -> Self
    where
        E: Into<PatternError>,
    {
        error.into().into()
    }

    pub fn build<E>(error: E) -> Self
    where
        E: Into<BuildError>,
    {
        error.into().into()
    }
}
