use crate::scoring::ScoringError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreaseError {
    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("rejected: {0}")]
    Rejected(#[from] ScoringError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CreaseError>;
