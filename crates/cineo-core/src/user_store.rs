use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use cineo_models::{ContentId, User, WatchHistoryItem};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::error::StoreError;

pub type SharedStore = Arc<dyn UserStore>;

/// Durable home of user documents.
///
/// Writes are unconditional overwrites; the last writer wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// All users, ordered by username
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Add a new user. Fails if the username is taken.
    async fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Replace the whole user document
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Replace a single watch-history record inside a user document
    async fn save_record(
        &self,
        user_id: &str,
        content_id: ContentId,
        item: &WatchHistoryItem,
    ) -> Result<(), StoreError>;
}

/// All users in one JSON file, keyed by user id
pub struct JsonUserStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonUserStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, User>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("User store {} does not exist yet", self.path.display());
                Ok(BTreeMap::new())
            }
            Err(e) => Err(StoreError::io(self.path.display().to_string(), e)),
        }
    }

    /// Write to a temp file next to the target, then rename over it
    async fn write_all(&self, users: &BTreeMap<String, User>) -> Result<(), StoreError> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(display.clone(), e))?;
        }
        let json = serde_json::to_string_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, json).await {
            warn!("Failed to write user store temp file {}: {}", tmp.display(), e);
            return Err(StoreError::io(tmp.display().to_string(), e));
        }
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(display, e))?;
        debug!("User store saved: {} ({} users)", self.path.display(), users.len());
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn load(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(user_id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_all()
            .await?
            .into_values()
            .find(|u| u.username == username))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users: Vec<User> = self.read_all().await?.into_values().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        users.insert(user.id.clone(), user);
        self.write_all(&users).await
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        users.insert(user.id.clone(), user.clone());
        self.write_all(&users).await
    }

    async fn save_record(
        &self,
        user_id: &str,
        content_id: ContentId,
        item: &WatchHistoryItem,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;
        user.watch_history.insert(content_id, item.clone());
        self.write_all(&users).await
    }
}
