use chrono::Utc;
use cineo_models::{
    ContentDetails, ContentId, ContentSnapshot, ContentSummary, MediaKind, PersonId,
    SeasonDetails, SeasonSummary, User, WatchHistoryItem, WatchStatus,
};
use tracing::{debug, info, instrument, warn};
use crate::error::TrackError;
use crate::history::WatchHistoryStore;
use crate::kind_resolver::KindResolver;
use crate::reconcile;
use crate::stats::{profile_stats, ProfileStats};
use crate::sync::{SyncGateway, SyncTicket};

/// A change that was applied locally and handed to the sync gateway
pub struct Committed {
    pub content_id: ContentId,
    pub item: WatchHistoryItem,
    pub ticket: SyncTicket,
}

/// Everything one interactive session owns: the signed-in user's history,
/// the kind resolver and the sync gateway.
///
/// Tracking operations take `&mut self` and finish their local update before
/// returning, so they apply in call order.
pub struct Session {
    resolver: KindResolver,
    gateway: SyncGateway,
    history: Option<WatchHistoryStore>,
}

fn ensure_series(existing: Option<&WatchHistoryItem>, content: &ContentSnapshot) -> Result<(), TrackError> {
    let kind = existing.map_or(content.kind, |item| item.media_kind);
    if kind == MediaKind::Series {
        Ok(())
    } else {
        Err(TrackError::NotASeries(content.id))
    }
}

impl Session {
    pub fn new(resolver: KindResolver, gateway: SyncGateway) -> Self {
        Self {
            resolver,
            gateway,
            history: None,
        }
    }

    pub fn resolver(&self) -> &KindResolver {
        &self.resolver
    }

    pub fn sign_in(&mut self, user: User) {
        info!("Signed in as {} ({} tracked titles)", user.username, user.watch_history.len());
        self.history = Some(WatchHistoryStore::new(user));
    }

    /// Drop the signed-in user after all pending writes have finished
    pub async fn sign_out(&mut self) -> Option<User> {
        self.gateway.flush().await;
        let user = self.history.take().map(WatchHistoryStore::into_user);
        if let Some(ref user) = user {
            info!("Signed out {}", user.username);
        }
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.history.as_ref().map(WatchHistoryStore::user)
    }

    pub fn history(&self) -> Option<&WatchHistoryStore> {
        self.history.as_ref()
    }

    fn signed_in(&self) -> Result<&WatchHistoryStore, TrackError> {
        self.history.as_ref().ok_or(TrackError::AuthenticationRequired)
    }

    pub fn stats(&self) -> Result<ProfileStats, TrackError> {
        Ok(profile_stats(self.signed_in()?))
    }

    pub async fn flush(&self) {
        self.gateway.flush().await;
    }

    pub async fn trending(&mut self) -> Result<Vec<ContentSummary>, TrackError> {
        let lang = self.resolver.language();
        let listing = self.resolver.provider().trending(lang).await?;
        self.resolver.observe(&listing);
        Ok(listing)
    }

    pub async fn search(&mut self, query: &str) -> Result<Vec<ContentSummary>, TrackError> {
        let lang = self.resolver.language();
        let results = self.resolver.provider().search(query, lang).await?;
        self.resolver.observe(&results);
        Ok(results)
    }

    /// Filmography of a cast member; the credits feed the resolver like a listing
    pub async fn person_credits(&mut self, person_id: PersonId) -> Result<Vec<ContentSummary>, TrackError> {
        let lang = self.resolver.language();
        let credits = self.resolver.provider().person_credits(person_id, lang).await?;
        self.resolver.observe(&credits);
        Ok(credits)
    }

    pub async fn details(&mut self, id: ContentId, hint: Option<MediaKind>) -> Result<ContentDetails, TrackError> {
        let hint = hint.or_else(|| self.recorded_kind(id));
        self.resolver.load_details(id, hint).await
    }

    pub async fn season(&mut self, series_id: ContentId, season_number: u32) -> Result<SeasonDetails, TrackError> {
        let lang = self.resolver.language();
        Ok(self
            .resolver
            .provider()
            .season_details(series_id, season_number, lang)
            .await?)
    }

    /// Kind fixed by an existing history record, if any
    fn recorded_kind(&self, id: ContentId) -> Option<MediaKind> {
        self.history.as_ref()?.get(id).map(|item| item.media_kind)
    }

    /// Details for an episode operation: without other evidence the id is
    /// looked up as a series first
    async fn series_details(&mut self, id: ContentId) -> Result<ContentDetails, TrackError> {
        let hint = self
            .recorded_kind(id)
            .or_else(|| self.resolver.known_kind(id))
            .unwrap_or(MediaKind::Series);
        self.resolver.load_details(id, Some(hint)).await
    }

    fn commit(&mut self, content_id: ContentId, item: WatchHistoryItem) -> Result<Committed, TrackError> {
        let history = self.history.as_mut().ok_or(TrackError::AuthenticationRequired)?;
        history.upsert(content_id, item.clone());
        let ticket = self.gateway.commit(history.user(), content_id);
        debug!(
            "Committed {} for {}: {} {}",
            content_id,
            history.user_id(),
            item.status,
            item.position_label().unwrap_or_default()
        );
        Ok(Committed { content_id, item, ticket })
    }

    #[instrument(skip(self, content), fields(content_id = content.id))]
    pub fn set_status(&mut self, content: &ContentSnapshot, status: WatchStatus) -> Result<Committed, TrackError> {
        let existing = self.signed_in()?.get(content.id);
        let item = reconcile::set_status(existing, content, status, Utc::now());
        self.commit(content.id, item)
    }

    #[instrument(skip(self, content), fields(content_id = content.id))]
    pub fn toggle_episode(
        &mut self,
        content: &ContentSnapshot,
        season_number: u32,
        episode_number: u32,
    ) -> Result<Committed, TrackError> {
        let existing = self.signed_in()?.get(content.id);
        ensure_series(existing, content)?;
        let item = reconcile::toggle_episode(existing, content, season_number, episode_number, Utc::now());
        self.commit(content.id, item)
    }

    #[instrument(skip(self, content, season), fields(content_id = content.id, season = season.season_number))]
    pub fn toggle_full_season(&mut self, content: &ContentSnapshot, season: &SeasonSummary) -> Result<Committed, TrackError> {
        let existing = self.signed_in()?.get(content.id);
        ensure_series(existing, content)?;
        let item = reconcile::toggle_full_season(existing, content, season, Utc::now());
        self.commit(content.id, item)
    }

    /// Set a status knowing only the content id; the kind is resolved first
    pub async fn set_status_by_id(
        &mut self,
        id: ContentId,
        hint: Option<MediaKind>,
        status: WatchStatus,
    ) -> Result<Committed, TrackError> {
        self.signed_in()?;
        let details = self.details(id, hint).await?;
        self.set_status(&details.snapshot(), status)
    }

    pub async fn toggle_episode_by_id(
        &mut self,
        id: ContentId,
        season_number: u32,
        episode_number: u32,
    ) -> Result<Committed, TrackError> {
        self.signed_in()?;
        let details = self.series_details(id).await?;
        self.toggle_episode(&details.snapshot(), season_number, episode_number)
    }

    /// Toggle a whole season, sizing it from the season's episode list
    pub async fn toggle_full_season_by_id(&mut self, id: ContentId, season_number: u32) -> Result<Committed, TrackError> {
        self.signed_in()?;
        let details = self.series_details(id).await?;
        let snapshot = details.snapshot();
        ensure_series(self.signed_in()?.get(id), &snapshot)?;

        let season = match self.season(id, season_number).await {
            Ok(season) => season.summary(),
            Err(e) => {
                warn!("Season {} of {} unavailable ({}), using the series summary", season_number, id, e);
                details
                    .as_series()
                    .and_then(|series| series.season(season_number))
                    .cloned()
                    .ok_or(TrackError::SeasonNotFound { id, season: season_number })?
            }
        };
        self.toggle_full_season(&snapshot, &season)
    }

    /// Change the avatar of the signed-in user; `None` restores the default
    pub fn update_avatar(&mut self, avatar: Option<String>) -> Result<SyncTicket, TrackError> {
        let history = self.history.as_mut().ok_or(TrackError::AuthenticationRequired)?;
        history.set_avatar(avatar);
        Ok(self.gateway.commit_profile(history.user()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use cineo_config::{SyncConfig, SyncMode};
    use cineo_models::{KindEvidence, Language};
    use tokio::sync::mpsc;
    use crate::testing::{film, film_snapshot, season, series, series_snapshot, summary, FakeProvider, MemoryUserStore};
    use crate::user_store::UserStore;

    fn session_with(provider: FakeProvider, store: Arc<MemoryUserStore>) -> Session {
        let resolver = KindResolver::new(Arc::new(provider), Language::En);
        let gateway = SyncGateway::new(store, &SyncConfig { enabled: true, mode: SyncMode::FullUser });
        Session::new(resolver, gateway)
    }

    async fn signed_in(provider: FakeProvider) -> (Session, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let user = User::new("u1".to_string(), "nigar".to_string());
        store.insert(user.clone()).await.unwrap();
        let mut session = session_with(provider, store.clone());
        session.sign_in(user);
        (session, store)
    }

    #[tokio::test]
    async fn test_operations_require_sign_in() {
        let store = Arc::new(MemoryUserStore::new());
        let mut session = session_with(FakeProvider::new().with_details(series(66732, 8)), store.clone());
        let content = series_snapshot(66732);

        assert!(matches!(session.set_status(&content, WatchStatus::Planned), Err(TrackError::AuthenticationRequired)));
        assert!(matches!(session.toggle_episode(&content, 1, 1), Err(TrackError::AuthenticationRequired)));
        assert!(matches!(
            session.toggle_full_season(&content, &season(1, 8)),
            Err(TrackError::AuthenticationRequired)
        ));
        assert!(matches!(
            session.toggle_full_season_by_id(66732, 1).await,
            Err(TrackError::AuthenticationRequired)
        ));
        assert!(matches!(session.update_avatar(None), Err(TrackError::AuthenticationRequired)));
        assert!(session.stats().is_err());

        session.flush().await;
        assert!(session.history().is_none());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_commit_reaches_store() {
        let (mut session, store) = signed_in(FakeProvider::new()).await;
        let committed = session.toggle_episode(&series_snapshot(66732), 1, 3).unwrap();
        assert_eq!(committed.item.status, WatchStatus::Watching);
        assert!(committed.ticket.wait().await);

        let stored = store.get("u1").unwrap();
        assert!(stored.watch_history[&66732].watched_episodes.contains(1, 3));
    }

    #[tokio::test]
    async fn test_episode_operations_reject_films() {
        let (mut session, _) = signed_in(FakeProvider::new().with_details(film(603))).await;
        let content = film_snapshot(603);

        assert!(matches!(session.toggle_episode(&content, 1, 1), Err(TrackError::NotASeries(603))));
        assert!(matches!(
            session.toggle_full_season(&content, &season(1, 3)),
            Err(TrackError::NotASeries(603))
        ));
        assert!(matches!(session.toggle_episode_by_id(603, 1, 1).await, Err(TrackError::NotASeries(603))));
        assert!(session.history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recorded_series_kind_survives_film_snapshot() {
        let (mut session, _) = signed_in(FakeProvider::new()).await;
        session.toggle_episode(&series_snapshot(500), 1, 1).unwrap();

        let committed = session.toggle_episode(&film_snapshot(500), 1, 2).unwrap();
        assert_eq!(committed.item.media_kind, MediaKind::Series);
        assert_eq!(committed.item.watched_episodes.season_len(1), 2);
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_state() {
        let store = Arc::new(MemoryUserStore::new());
        let user = User::new("u1".to_string(), "nigar".to_string());
        store.insert(user.clone()).await.unwrap();
        store.fail_writes(true);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let resolver = KindResolver::new(Arc::new(FakeProvider::new()), Language::En);
        let gateway = SyncGateway::with_observer(
            store.clone(),
            &SyncConfig { enabled: true, mode: SyncMode::SingleRecord },
            Some(tx),
        );
        let mut session = Session::new(resolver, gateway);
        session.sign_in(user);

        let committed = session.set_status(&film_snapshot(603), WatchStatus::Watched).unwrap();
        assert!(!committed.ticket.wait().await);
        assert!(!rx.recv().await.unwrap().is_ok());

        let local = session.history().unwrap().get(603).unwrap();
        assert_eq!(local.status, WatchStatus::Watched);
        assert!(store.get("u1").unwrap().watch_history.is_empty());
    }

    #[tokio::test]
    async fn test_set_status_by_id_resolves_kind() {
        let (mut session, _) = signed_in(FakeProvider::new().with_details(series(1399, 10))).await;

        let committed = session.set_status_by_id(1399, None, WatchStatus::Planned).await.unwrap();
        assert_eq!(committed.item.media_kind, MediaKind::Series);
        assert_eq!(committed.item.title, "Series 1399");
        assert_eq!(session.resolver().known_kind(1399), Some(MediaKind::Series));

        assert!(matches!(
            session.set_status_by_id(404, None, WatchStatus::Planned).await,
            Err(TrackError::NotFound(404))
        ));
        assert_eq!(session.history().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_by_id_operations_on_shared_ids() {
        let provider = FakeProvider::new().with_details(film(77)).with_details(series(77, 6));
        let (mut session, _) = signed_in(provider).await;

        let committed = session.set_status_by_id(77, None, WatchStatus::Planned).await.unwrap();
        assert_eq!(committed.item.media_kind, MediaKind::Film);
        assert!(session.resolver().is_unconfirmed(77));

        // The recorded kind now pins the id, so episode operations refuse it
        assert!(matches!(session.toggle_episode_by_id(77, 1, 1).await, Err(TrackError::NotASeries(77))));

        let (mut session, _) = signed_in(FakeProvider::new().with_details(film(78)).with_details(series(78, 6))).await;
        let committed = session.toggle_episode_by_id(78, 1, 2).await.unwrap();
        assert_eq!(committed.item.media_kind, MediaKind::Series);
        assert!(!session.resolver().is_unconfirmed(78));
    }

    #[tokio::test]
    async fn test_person_credits_feed_resolver() {
        let credits = vec![
            summary(1399, Some(KindEvidence::Tagged(MediaKind::Series))),
            summary(603, Some(KindEvidence::Tagged(MediaKind::Film))),
        ];
        let (mut session, _) = signed_in(FakeProvider::new().with_credits(22970, credits)).await;

        let loaded = session.person_credits(22970).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(session.resolver().known_kind(1399), Some(MediaKind::Series));
        assert!(session.person_credits(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_season_by_id_uses_loaded_episode_count() {
        let provider = FakeProvider::new()
            .with_details(series(66732, 8))
            .with_listing(vec![summary(66732, Some(KindEvidence::Tagged(MediaKind::Series)))]);
        let (mut session, _) = signed_in(provider).await;
        session.trending().await.unwrap();

        session.toggle_episode_by_id(66732, 1, 3).await.unwrap();
        let filled = session.toggle_full_season_by_id(66732, 1).await.unwrap();
        assert_eq!(filled.item.watched_episodes.season_len(1), 8);
        assert_eq!(filled.item.position_label().as_deref(), Some("S1 E8"));

        let reset = session.toggle_full_season_by_id(66732, 1).await.unwrap();
        assert_eq!(reset.item.watched_episodes.season_len(1), 0);

        assert!(matches!(
            session.toggle_full_season_by_id(66732, 7).await,
            Err(TrackError::SeasonNotFound { id: 66732, season: 7 })
        ));
    }

    #[tokio::test]
    async fn test_sign_out_flushes_and_returns_user() {
        let (mut session, store) = signed_in(FakeProvider::new()).await;
        let _ = session.set_status(&film_snapshot(603), WatchStatus::Planned).unwrap();
        let _ = session.update_avatar(Some("https://example.com/a.png".to_string())).unwrap();

        let user = session.sign_out().await.unwrap();
        assert_eq!(user.avatar.as_deref(), Some("https://example.com/a.png"));
        assert!(session.current_user().is_none());

        let stored = store.get("u1").unwrap();
        assert_eq!(stored, user);
    }
}
