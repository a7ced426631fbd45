pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AdminConfig, Config, LoggingConfig, SearchConfig, SyncConfig, SyncMode, TmdbConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, PathOrigin, BASE_PATH_ENV};
