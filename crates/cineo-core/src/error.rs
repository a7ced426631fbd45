use cineo_models::ContentId;
use cineo_sources::SourceError;
use thiserror::Error;

/// Errors surfaced by tracking operations
#[derive(Error, Debug)]
pub enum TrackError {
    /// No signed-in user; the front end turns this into a login prompt
    #[error("sign in to track what you watch")]
    AuthenticationRequired,

    #[error("content {0} not found as a film or a series")]
    NotFound(ContentId),

    #[error("content {0} is not a series")]
    NotASeries(ContentId),

    #[error("season {season} of content {id} not found")]
    SeasonNotFound { id: ContentId, season: u32 },

    #[error("metadata provider error: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode user document: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("user {0} not found")]
    UnknownUser(String),

    #[error("username {0} is already taken")]
    DuplicateUsername(String),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Account and credential failures
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("user {0} not found")]
    UnknownUser(String),

    #[error("administrator rights required")]
    Forbidden,

    #[error("this account's password is managed in the config file")]
    ManagedAccount,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hash(err.to_string())
    }
}
