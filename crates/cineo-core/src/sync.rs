use cineo_config::{SyncConfig, SyncMode};
use cineo_models::{ContentId, User, WatchHistoryItem};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use crate::error::StoreError;
use crate::user_store::SharedStore;

/// What a single durable write carries
#[derive(Debug, Clone)]
pub enum SyncPayload {
    FullUser(User),
    Record {
        user_id: String,
        content_id: ContentId,
        item: WatchHistoryItem,
    },
}

impl SyncPayload {
    pub fn user_id(&self) -> &str {
        match self {
            Self::FullUser(user) => &user.id,
            Self::Record { user_id, .. } => user_id,
        }
    }
}

/// Result of one durable write, reported to the log and the observer
#[derive(Debug)]
pub struct SyncOutcome {
    pub user_id: String,
    /// `None` for profile-only writes
    pub content_id: Option<ContentId>,
    pub result: Result<(), StoreError>,
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Handle to a dispatched write. Dropping it does not cancel the write.
pub struct SyncTicket {
    done: Option<oneshot::Receiver<bool>>,
}

impl SyncTicket {
    fn skipped() -> Self {
        Self { done: None }
    }

    /// Wait for the write. `true` when it landed or when sync is disabled.
    pub async fn wait(self) -> bool {
        match self.done {
            Some(rx) => rx.await.unwrap_or(false),
            None => true,
        }
    }
}

enum Job {
    Write {
        payload: SyncPayload,
        content_id: Option<ContentId>,
        done: oneshot::Sender<bool>,
    },
    Flush(oneshot::Sender<()>),
}

/// The only component that writes user state to the durable store.
///
/// Writes run on one background task and land in dispatch order, so the
/// last committed state is the last one written. Failures are logged and
/// reported to the observer but never retried.
pub struct SyncGateway {
    mode: SyncMode,
    queue: Option<mpsc::UnboundedSender<Job>>,
}

impl SyncGateway {
    /// Must be called from within a tokio runtime
    pub fn new(store: SharedStore, config: &SyncConfig) -> Self {
        Self::with_observer(store, config, None)
    }

    pub fn with_observer(
        store: SharedStore,
        config: &SyncConfig,
        observer: Option<mpsc::UnboundedSender<SyncOutcome>>,
    ) -> Self {
        if !config.enabled {
            info!("Sync disabled, changes stay in memory for this session");
            return Self { mode: config.mode, queue: None };
        }
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, rx, observer));
        Self { mode: config.mode, queue: Some(tx) }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Hand over the state after a change to `content_id`
    pub fn commit(&self, user: &User, content_id: ContentId) -> SyncTicket {
        let payload = match self.mode {
            SyncMode::FullUser => SyncPayload::FullUser(user.clone()),
            SyncMode::SingleRecord => match user.watch_history.get(&content_id) {
                Some(item) => SyncPayload::Record {
                    user_id: user.id.clone(),
                    content_id,
                    item: item.clone(),
                },
                None => {
                    warn!("Sync: no record {} for user {}, nothing to write", content_id, user.id);
                    return SyncTicket::skipped();
                }
            },
        };
        self.dispatch(payload, Some(content_id))
    }

    /// Profile changes always write the whole document
    pub fn commit_profile(&self, user: &User) -> SyncTicket {
        self.dispatch(SyncPayload::FullUser(user.clone()), None)
    }

    fn dispatch(&self, payload: SyncPayload, content_id: Option<ContentId>) -> SyncTicket {
        let Some(queue) = &self.queue else {
            return SyncTicket::skipped();
        };
        let (done, rx) = oneshot::channel();
        if queue.send(Job::Write { payload, content_id, done }).is_err() {
            warn!("Sync writer has stopped, change was not persisted");
            return SyncTicket { done: None };
        }
        SyncTicket { done: Some(rx) }
    }

    /// Wait until every write dispatched so far has finished
    pub async fn flush(&self) {
        let Some(queue) = &self.queue else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if queue.send(Job::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

async fn run_writer(
    store: SharedStore,
    mut rx: mpsc::UnboundedReceiver<Job>,
    observer: Option<mpsc::UnboundedSender<SyncOutcome>>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Write { payload, content_id, done } => {
                let user_id = payload.user_id().to_string();
                let result = match &payload {
                    SyncPayload::FullUser(user) => store.save(user).await,
                    SyncPayload::Record { user_id, content_id, item } => {
                        store.save_record(user_id, *content_id, item).await
                    }
                };
                match &result {
                    Ok(()) => debug!("Sync: wrote user {} (content {:?})", user_id, content_id),
                    Err(e) => warn!("Sync: write for user {} (content {:?}) failed: {}", user_id, content_id, e),
                }
                let landed = result.is_ok();
                if let Some(observer) = &observer {
                    let _ = observer.send(SyncOutcome { user_id, content_id, result });
                }
                let _ = done.send(landed);
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Sync writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Utc;
    use cineo_models::{MediaKind, WatchStatus, WatchedEpisodes};
    use crate::testing::MemoryUserStore;
    use crate::user_store::UserStore;

    fn item(status: WatchStatus) -> WatchHistoryItem {
        WatchHistoryItem {
            status,
            media_kind: MediaKind::Film,
            genres: Vec::new(),
            countries: Vec::new(),
            runtime: None,
            added_at: Utc::now(),
            title: "Film".to_string(),
            poster_path: None,
            current_season: None,
            current_episode: None,
            watched_episodes: WatchedEpisodes::new(),
        }
    }

    fn config(mode: SyncMode) -> SyncConfig {
        SyncConfig { enabled: true, mode }
    }

    #[tokio::test]
    async fn test_full_user_writes_land_in_order() {
        let store = Arc::new(MemoryUserStore::new());
        let gateway = SyncGateway::new(store.clone(), &config(SyncMode::FullUser));
        let mut user = User::new("u1".to_string(), "nigar".to_string());

        for status in [WatchStatus::Planned, WatchStatus::Watching, WatchStatus::Watched] {
            user.watch_history.insert(603, item(status));
            let _ = gateway.commit(&user, 603);
        }
        gateway.flush().await;

        assert_eq!(store.writes(), 3);
        assert_eq!(store.get("u1").unwrap().watch_history[&603].status, WatchStatus::Watched);
    }

    #[tokio::test]
    async fn test_single_record_mode_patches_record() {
        let store = Arc::new(MemoryUserStore::new());
        let mut user = User::new("u1".to_string(), "nigar".to_string());
        store.insert(user.clone()).await.unwrap();
        user.email = "local-only@example.com".to_string();
        user.watch_history.insert(603, item(WatchStatus::Planned));

        let gateway = SyncGateway::new(store.clone(), &config(SyncMode::SingleRecord));
        assert!(gateway.commit(&user, 603).wait().await);

        let stored = store.get("u1").unwrap();
        assert_eq!(stored.watch_history[&603].status, WatchStatus::Planned);
        assert!(stored.email.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_reported_to_observer() {
        let store = Arc::new(MemoryUserStore::new());
        store.fail_writes(true);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gateway = SyncGateway::with_observer(store.clone(), &config(SyncMode::FullUser), Some(tx));

        let mut user = User::new("u1".to_string(), "nigar".to_string());
        user.watch_history.insert(603, item(WatchStatus::Watched));
        assert!(!gateway.commit(&user, 603).wait().await);

        let outcome = rx.recv().await.unwrap();
        assert!(!outcome.is_ok());
        assert_eq!(outcome.user_id, "u1");
        assert_eq!(outcome.content_id, Some(603));
        assert!(store.get("u1").is_none());
    }

    #[tokio::test]
    async fn test_disabled_gateway_skips_writes() {
        let store = Arc::new(MemoryUserStore::new());
        let gateway = SyncGateway::new(store.clone(), &SyncConfig { enabled: false, mode: SyncMode::FullUser });
        let user = User::new("u1".to_string(), "nigar".to_string());

        assert!(gateway.commit_profile(&user).wait().await);
        gateway.flush().await;
        assert_eq!(store.writes(), 0);
    }
}
