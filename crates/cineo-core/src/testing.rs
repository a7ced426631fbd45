//! In-memory fakes shared by the unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use cineo_models::{
    ContentDetails, ContentId, ContentSnapshot, ContentSummary, Episode, FilmDetails, Genre,
    KindEvidence, Language, MediaKind, PersonId, SeasonDetails, SeasonSummary, SeriesDetails,
    User, WatchHistoryItem,
};
use cineo_sources::{MetadataProvider, SourceError};
use crate::error::StoreError;
use crate::user_store::UserStore;

pub(crate) fn summary(id: ContentId, kind: Option<KindEvidence>) -> ContentSummary {
    ContentSummary {
        id,
        kind,
        title: format!("Title {}", id),
        poster_path: None,
        genre_ids: Vec::new(),
        origin_country: Vec::new(),
        vote_average: 0.0,
        date: None,
    }
}

pub(crate) fn film(id: ContentId) -> ContentDetails {
    ContentDetails::Film(FilmDetails {
        id,
        title: format!("Film {}", id),
        overview: String::new(),
        poster_path: Some(format!("/film{}.jpg", id)),
        backdrop_path: None,
        genres: vec![Genre { id: 28, name: "Action".to_string() }],
        production_countries: vec!["US".to_string()],
        release_date: Some("1999-03-30".to_string()),
        runtime: Some(120),
        vote_average: 7.5,
        status: Some("Released".to_string()),
        cast: Vec::new(),
        recommendations: Vec::new(),
        trailer: None,
    })
}

/// A two-season series with `episodes` episodes per season
pub(crate) fn series(id: ContentId, episodes: u32) -> ContentDetails {
    ContentDetails::Series(SeriesDetails {
        id,
        name: format!("Series {}", id),
        overview: String::new(),
        poster_path: Some(format!("/series{}.jpg", id)),
        backdrop_path: None,
        genres: vec![Genre { id: 18, name: "Drama".to_string() }],
        origin_country: vec!["DE".to_string()],
        first_air_date: Some("2017-12-01".to_string()),
        number_of_seasons: Some(2),
        number_of_episodes: Some(episodes * 2),
        vote_average: 8.4,
        status: Some("Ended".to_string()),
        seasons: (1..=2)
            .map(|n| SeasonSummary {
                season_number: n,
                episode_count: episodes,
                name: format!("Season {}", n),
                air_date: None,
            })
            .collect(),
        cast: Vec::new(),
        recommendations: Vec::new(),
        trailer: None,
    })
}

pub(crate) fn with_recommendations(mut details: ContentDetails, recommendations: Vec<ContentSummary>) -> ContentDetails {
    match &mut details {
        ContentDetails::Film(film) => film.recommendations = recommendations,
        ContentDetails::Series(series) => series.recommendations = recommendations,
    }
    details
}

pub(crate) fn film_snapshot(id: ContentId) -> ContentSnapshot {
    film(id).snapshot()
}

pub(crate) fn series_snapshot(id: ContentId) -> ContentSnapshot {
    series(id, 8).snapshot()
}

pub(crate) fn season(number: u32, episode_count: u32) -> SeasonSummary {
    SeasonSummary {
        season_number: number,
        episode_count,
        name: format!("Season {}", number),
        air_date: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeProvider {
    details: HashMap<(ContentId, MediaKind), ContentDetails>,
    listing: Vec<ContentSummary>,
    credits: HashMap<PersonId, Vec<ContentSummary>>,
    failing: Option<MediaKind>,
    search_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(ContentId, MediaKind)>>,
    searches: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_details(mut self, details: ContentDetails) -> Self {
        self.details.insert((details.id(), details.kind()), details);
        self
    }

    pub(crate) fn with_credits(mut self, person_id: PersonId, credits: Vec<ContentSummary>) -> Self {
        self.credits.insert(person_id, credits);
        self
    }

    pub(crate) fn with_listing(mut self, listing: Vec<ContentSummary>) -> Self {
        self.listing = listing;
        self
    }

    /// Details lookups for `kind` return an error
    pub(crate) fn failing_for(mut self, kind: MediaKind) -> Self {
        self.failing = Some(kind);
        self
    }

    pub(crate) fn with_search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(ContentId, MediaKind)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    type Error = SourceError;

    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn trending(&self, _lang: Language) -> Result<Vec<ContentSummary>, SourceError> {
        Ok(self.listing.clone())
    }

    async fn details(
        &self,
        id: ContentId,
        kind: MediaKind,
        _lang: Language,
    ) -> Result<Option<ContentDetails>, SourceError> {
        self.calls.lock().unwrap().push((id, kind));
        if self.failing == Some(kind) {
            return Err(SourceError::new(format!("{} lookup unavailable", kind)));
        }
        Ok(self.details.get(&(id, kind)).cloned())
    }

    async fn season_details(
        &self,
        series_id: ContentId,
        season_number: u32,
        _lang: Language,
    ) -> Result<SeasonDetails, SourceError> {
        let summary = self
            .details
            .get(&(series_id, MediaKind::Series))
            .and_then(ContentDetails::as_series)
            .and_then(|s| s.season(season_number))
            .ok_or_else(|| SourceError::new(format!("season {} of {} not found", season_number, series_id)))?;
        Ok(SeasonDetails {
            season_number,
            name: summary.name.clone(),
            air_date: None,
            episodes: (1..=summary.episode_count)
                .map(|n| Episode {
                    episode_number: n,
                    name: format!("Episode {}", n),
                    air_date: None,
                    still_path: None,
                    vote_average: 0.0,
                })
                .collect(),
        })
    }

    async fn search(&self, query: &str, _lang: Language) -> Result<Vec<ContentSummary>, SourceError> {
        self.searches.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        let needle = query.to_lowercase();
        Ok(self
            .listing
            .iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn person_credits(&self, person_id: PersonId, _lang: Language) -> Result<Vec<ContentSummary>, SourceError> {
        Ok(self.credits.get(&person_id).cloned().unwrap_or_default())
    }
}

/// User store kept in memory, with switchable write failures
#[derive(Default)]
pub(crate) struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryUserStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn get(&self, user_id: &str) -> Option<User> {
        self.users.lock().unwrap().get(user_id).cloned()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Other("disk full".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn load(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get(user_id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        self.check_write()?;
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.check_write()?;
        self.users.lock().unwrap().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_record(
        &self,
        user_id: &str,
        content_id: ContentId,
        item: &WatchHistoryItem,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;
        user.watch_history.insert(content_id, item.clone());
        Ok(())
    }
}
