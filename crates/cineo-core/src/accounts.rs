use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use cineo_config::AdminConfig;
use cineo_models::{Role, User};
use tracing::{debug, info, warn};
use uuid::Uuid;
use crate::error::AccountError;
use crate::user_store::SharedStore;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Id of the built-in administrator's document
pub const ADMIN_USER_ID: &str = "admin_root";

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Fields an administrator may edit on any account
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

/// Authentication boundary
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<User, AccountError>;

    async fn login(&self, username: &str, password: &str) -> Result<User, AccountError>;

    /// Reload a previously signed-in user by id
    async fn restore(&self, user_id: &str) -> Result<Option<User>, AccountError>;

    async fn change_password(&self, user_id: &str, current: &str, new_password: &str) -> Result<(), AccountError>;
}

pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("Stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

fn check_password_len(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

/// Accounts kept in the durable user store, plus an optional administrator
/// whose credentials live in the config file
pub struct LocalAccounts {
    store: SharedStore,
    admin: Option<AdminConfig>,
}

impl LocalAccounts {
    pub fn new(store: SharedStore, admin: Option<AdminConfig>) -> Self {
        Self { store, admin }
    }

    fn is_admin_name(&self, username: &str) -> bool {
        self.admin.as_ref().is_some_and(|a| a.username == username)
    }

    /// Load the administrator's document, creating it on first sign-in
    async fn admin_user(&self, admin: &AdminConfig) -> Result<User, AccountError> {
        if let Some(user) = self.store.load(ADMIN_USER_ID).await? {
            return Ok(user);
        }
        let mut user = User::new(ADMIN_USER_ID.to_string(), admin.username.clone());
        user.email = admin.email.clone();
        user.role = Role::Admin;
        self.store.save(&user).await?;
        info!("Created administrator document for {}", admin.username);
        Ok(user)
    }

    fn require_admin(actor: &User) -> Result<(), AccountError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AccountError::Forbidden)
        }
    }

    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>, AccountError> {
        Self::require_admin(actor)?;
        Ok(self.store.list().await?)
    }

    /// Administrator edit of another account's contact details or password
    pub async fn update_user(&self, actor: &User, user_id: &str, update: ProfileUpdate) -> Result<User, AccountError> {
        Self::require_admin(actor)?;
        let mut user = self
            .store
            .load(user_id)
            .await?
            .ok_or_else(|| AccountError::UnknownUser(user_id.to_string()))?;

        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar).filter(|a| !a.is_empty());
        }
        if let Some(password) = update.password {
            check_password_len(&password)?;
            user.password_hash = Some(hash_password(&password)?);
        }
        self.store.save(&user).await?;
        info!("Administrator {} updated user {}", actor.username, user.username);
        Ok(user)
    }
}

#[async_trait]
impl IdentityProvider for LocalAccounts {
    async fn register(&self, registration: Registration) -> Result<User, AccountError> {
        let username = registration.username.trim().to_string();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        check_password_len(&registration.password)?;
        if self.is_admin_name(&username) || self.store.find_by_username(&username).await?.is_some() {
            return Err(AccountError::UsernameTaken(username));
        }

        let mut user = User::new(Uuid::new_v4().simple().to_string(), username);
        user.email = registration.email;
        user.phone = registration.phone;
        user.password_hash = Some(hash_password(&registration.password)?);

        self.store.insert(user.clone()).await.map_err(|e| match e {
            crate::error::StoreError::DuplicateUsername(name) => AccountError::UsernameTaken(name),
            other => AccountError::Store(other),
        })?;
        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AccountError> {
        if let Some(admin) = self.admin.as_ref().filter(|a| a.username == username) {
            if !verify_password(password, &admin.password_hash) {
                warn!("Failed administrator sign-in for {}", username);
                return Err(AccountError::InvalidCredentials);
            }
            return self.admin_user(admin).await;
        }

        let Some(user) = self.store.find_by_username(username).await? else {
            debug!("Sign-in for unknown user {}", username);
            return Err(AccountError::InvalidCredentials);
        };
        match user.password_hash.as_deref() {
            Some(hash) if verify_password(password, hash) => Ok(user),
            _ => {
                warn!("Failed sign-in for {}", username);
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    async fn restore(&self, user_id: &str) -> Result<Option<User>, AccountError> {
        Ok(self.store.load(user_id).await?)
    }

    async fn change_password(&self, user_id: &str, current: &str, new_password: &str) -> Result<(), AccountError> {
        check_password_len(new_password)?;
        if user_id == ADMIN_USER_ID && self.admin.is_some() {
            return Err(AccountError::ManagedAccount);
        }
        let mut user = self
            .store
            .load(user_id)
            .await?
            .ok_or_else(|| AccountError::UnknownUser(user_id.to_string()))?;
        match user.password_hash.as_deref() {
            Some(hash) if verify_password(current, hash) => {}
            _ => return Err(AccountError::InvalidCredentials),
        }
        user.password_hash = Some(hash_password(new_password)?);
        self.store.save(&user).await?;
        info!("Password changed for {}", user.username);
        Ok(())
    }
}
