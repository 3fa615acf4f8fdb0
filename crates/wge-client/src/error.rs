use thiserror::Error;
use wge_core::ConsoleError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Fetch(String),

    #[error("no reconciled tree for {kind} {namespace}/{name} on cluster '{cluster}'")]
    TreeNotFound {
        kind: String,
        namespace: String,
        name: String,
        cluster: String,
    },

    #[error(transparent)]
    Core(#[from] ConsoleError),
}
