use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("profile '{0}' is required and cannot be deselected")]
    ProfileRequired(String),

    #[error("profile '{0}' is required with a single version, which cannot be changed")]
    VersionLocked(String),

    #[error("invalid repository '{0}': expected name:namespace")]
    InvalidRepository(String),

    #[error("invalid pointer event '{0}': expected down, up, leave or move:DX,DY")]
    InvalidPointerEvent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
