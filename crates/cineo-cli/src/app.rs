use std::sync::Arc;
use chrono::Utc;
use cineo_config::{Config, CredentialStore, PathManager};
use cineo_core::{
    KindResolver, LocalAccounts, Session, SharedProvider, SharedStore, SyncGateway, TrackError,
};
use cineo_core::{IdentityProvider, JsonUserStore};
use cineo_models::{Language, User};
use cineo_sources::TmdbClient;
use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use tracing::{debug, warn};

/// Everything a command needs: paths, config, the credential store and the
/// durable user store
pub struct App {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
    pub store: SharedStore,
    pub lang: Language,
}

impl App {
    pub fn load(paths: PathManager, config: Config, lang: Option<Language>) -> Result<Self> {
        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", paths.credentials_file().display(), e))?;
        let store: SharedStore = Arc::new(JsonUserStore::new(paths.users_file()));
        let lang = lang.unwrap_or(config.tmdb.language);
        Ok(Self { paths, config, credentials, store, lang })
    }

    pub fn accounts(&self) -> LocalAccounts {
        LocalAccounts::new(self.store.clone(), self.config.admin.clone())
    }

    fn api_key(&self) -> Option<&str> {
        self.credentials
            .get_tmdb_api_key()
            .map(String::as_str)
            .filter(|k| !k.is_empty())
            .or_else(|| Some(self.config.tmdb.api_key.as_str()).filter(|_| self.config.is_tmdb_configured()))
    }

    pub fn provider(&self) -> Result<SharedProvider> {
        let key = self
            .api_key()
            .ok_or_else(|| eyre!("TMDB API key is not configured. Run `cineo config set-api-key <KEY>`"))?;
        Ok(Arc::new(TmdbClient::from_config(&self.config.tmdb, Some(key))))
    }

    pub fn image_client(&self) -> TmdbClient {
        TmdbClient::from_config(&self.config.tmdb, self.api_key())
    }

    /// Session without a signed-in user. Without an API key the session
    /// still works for profile changes; provider calls will be rejected.
    pub fn session(&self) -> Result<Session> {
        let provider: SharedProvider = match self.provider() {
            Ok(provider) => provider,
            Err(_) => {
                debug!("No TMDB API key, provider lookups will fail");
                Arc::new(self.image_client())
            }
        };
        let resolver = KindResolver::new(provider, self.lang);
        let gateway = SyncGateway::new(self.store.clone(), &self.config.sync);
        Ok(Session::new(resolver, gateway))
    }

    /// Session restored from the credential store, when someone is signed in
    pub async fn restored_session(&self) -> Result<Session> {
        let mut session = self.session()?;
        if let Some(user) = self.current_user().await? {
            session.sign_in(user);
        }
        Ok(session)
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(user_id) = self.credentials.get_current_user_id() else {
            return Ok(None);
        };
        let user = self.accounts().restore(user_id).await?;
        if user.is_none() {
            warn!("Signed-in user {} no longer exists", user_id);
        } else if let Some(at) = self.credentials.get_signed_in_at() {
            debug!("Restored session for {} (signed in {})", user_id, at);
        }
        Ok(user)
    }

    pub async fn require_user(&self) -> Result<User> {
        self.current_user().await?.ok_or_else(|| track_error(TrackError::AuthenticationRequired))
    }

    pub fn remember(&mut self, user: &User) -> Result<()> {
        self.credentials.set_current_user(user.id.clone(), Utc::now());
        self.credentials
            .save()
            .map_err(|e| eyre!("Failed to save credentials: {}", e))
    }

    pub fn forget(&mut self) -> Result<()> {
        self.credentials.clear_current_user();
        self.credentials
            .save()
            .map_err(|e| eyre!("Failed to save credentials: {}", e))
    }
}

/// Turn tracking errors into messages for the terminal
pub fn track_error(err: TrackError) -> Report {
    match err {
        TrackError::AuthenticationRequired => {
            eyre!("Sign in to track what you watch: run `cineo login` or `cineo register`")
        }
        other => Report::new(other),
    }
}
