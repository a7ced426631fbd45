use cineo_models::{ContentId, User, WatchHistoryItem, WatchStatus};

/// In-memory watch history of the signed-in user.
///
/// Holds the whole user document so the sync gateway can be handed either
/// the full document or a single record. There is no delete operation.
#[derive(Debug, Clone)]
pub struct WatchHistoryStore {
    user: User,
}

impl WatchHistoryStore {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }

    pub fn get(&self, content_id: ContentId) -> Option<&WatchHistoryItem> {
        self.user.watch_history.get(&content_id)
    }

    /// Insert or replace the record for `content_id`
    pub fn upsert(&mut self, content_id: ContentId, item: WatchHistoryItem) {
        self.user.watch_history.insert(content_id, item);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContentId, &WatchHistoryItem)> {
        self.user.watch_history.iter().map(|(id, item)| (*id, item))
    }

    /// Records with the given status, most recently added first
    pub fn with_status(&self, status: WatchStatus) -> Vec<(ContentId, &WatchHistoryItem)> {
        let mut items: Vec<_> = self.iter().filter(|(_, item)| item.status == status).collect();
        items.sort_by(|a, b| b.1.added_at.cmp(&a.1.added_at).then(a.0.cmp(&b.0)));
        items
    }

    pub fn count(&self, status: WatchStatus) -> usize {
        self.user.watch_history.values().filter(|item| item.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.user.watch_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user.watch_history.is_empty()
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.user.avatar = avatar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use cineo_models::{MediaKind, WatchedEpisodes};

    fn item(status: WatchStatus, minutes_ago: i64) -> WatchHistoryItem {
        WatchHistoryItem {
            status,
            media_kind: MediaKind::Film,
            genres: Vec::new(),
            countries: Vec::new(),
            runtime: None,
            added_at: Utc::now() - Duration::minutes(minutes_ago),
            title: "Film".to_string(),
            poster_path: None,
            current_season: None,
            current_episode: None,
            watched_episodes: WatchedEpisodes::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_single_record() {
        let mut store = WatchHistoryStore::new(User::new("u1".to_string(), "nigar".to_string()));
        store.upsert(603, item(WatchStatus::Planned, 10));
        store.upsert(603, item(WatchStatus::Watched, 10));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(603).unwrap().status, WatchStatus::Watched);
        assert!(store.get(604).is_none());
    }

    #[test]
    fn test_status_views() {
        let mut store = WatchHistoryStore::new(User::new("u1".to_string(), "nigar".to_string()));
        store.upsert(1, item(WatchStatus::Watched, 30));
        store.upsert(2, item(WatchStatus::Watched, 5));
        store.upsert(3, item(WatchStatus::Planned, 1));

        assert_eq!(store.count(WatchStatus::Watched), 2);
        assert_eq!(store.count(WatchStatus::Watching), 0);
        let watched: Vec<ContentId> = store.with_status(WatchStatus::Watched).into_iter().map(|(id, _)| id).collect();
        assert_eq!(watched, vec![2, 1]);
    }
}
