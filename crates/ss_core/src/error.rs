use thiserror::Error;

use crate::tactics::TeamColor;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid lineup for {color:?} team: {reason}")]
    InvalidLineup { color: TeamColor, reason: String },

    #[error("Region index out of range: {0}")]
    RegionOutOfRange(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    /// Errors caused by the caller's input rather than the environment.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SimError::Config(_)
                | SimError::InvalidLineup { .. }
                | SimError::RegionOutOfRange(_)
                | SimError::Json(_)
                | SimError::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
