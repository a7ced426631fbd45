use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to metadata provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SourceError {
    pub fn new(message: String) -> Self {
        Self::Other(message)
    }
}
