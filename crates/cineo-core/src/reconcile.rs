//! Progress reconciliation.
//!
//! Each operation is a pure function of the existing record (if any), the
//! latest content snapshot, the event and the current time. The session
//! decides whether an operation may run and stores the result.

use std::collections::BTreeSet;
use chrono::{DateTime, Utc};
use cineo_models::{ContentSnapshot, SeasonSummary, WatchHistoryItem, WatchStatus, WatchedEpisodes};

/// Start from the existing record, or a fresh one created now, with the
/// display fields refreshed from `content`.
///
/// `added_at` and `media_kind` always come from the existing record. Tags
/// and runtime fall back to the previous values when the snapshot lacks them.
fn merge(existing: Option<&WatchHistoryItem>, content: &ContentSnapshot, now: DateTime<Utc>) -> WatchHistoryItem {
    let Some(prev) = existing else {
        return WatchHistoryItem {
            status: WatchStatus::None,
            media_kind: content.kind,
            genres: content.genres.clone(),
            countries: content.countries.clone(),
            runtime: content.runtime,
            added_at: now,
            title: content.title.clone(),
            poster_path: content.poster_path.clone(),
            current_season: None,
            current_episode: None,
            watched_episodes: WatchedEpisodes::new(),
        };
    };

    WatchHistoryItem {
        status: prev.status,
        media_kind: prev.media_kind,
        genres: if content.genres.is_empty() { prev.genres.clone() } else { content.genres.clone() },
        countries: if content.countries.is_empty() { prev.countries.clone() } else { content.countries.clone() },
        runtime: content.runtime.or(prev.runtime),
        added_at: prev.added_at,
        title: if content.title.is_empty() { prev.title.clone() } else { content.title.clone() },
        poster_path: content.poster_path.clone().or_else(|| prev.poster_path.clone()),
        current_season: prev.current_season,
        current_episode: prev.current_episode,
        watched_episodes: prev.watched_episodes.clone(),
    }
}

/// Set the status explicitly. Any transition is allowed; episode tracking is
/// left as it was.
pub fn set_status(
    existing: Option<&WatchHistoryItem>,
    content: &ContentSnapshot,
    status: WatchStatus,
    now: DateTime<Utc>,
) -> WatchHistoryItem {
    let mut item = merge(existing, content, now);
    item.status = status;
    item
}

/// Flip one episode in or out of the watched set and move the position
/// pointer to it, even when the episode was removed.
pub fn toggle_episode(
    existing: Option<&WatchHistoryItem>,
    content: &ContentSnapshot,
    season_number: u32,
    episode_number: u32,
    now: DateTime<Utc>,
) -> WatchHistoryItem {
    let mut item = merge(existing, content, now);
    item.watched_episodes.toggle(season_number, episode_number);
    item.status = item.status.after_progress();
    item.current_season = Some(season_number);
    item.current_episode = Some(episode_number);
    item
}

/// Fill a season with every episode, or clear it when it already holds as
/// many episodes as the season has. The pointer moves to the last episode
/// either way.
pub fn toggle_full_season(
    existing: Option<&WatchHistoryItem>,
    content: &ContentSnapshot,
    season: &SeasonSummary,
    now: DateTime<Utc>,
) -> WatchHistoryItem {
    let mut item = merge(existing, content, now);
    let number = season.season_number;

    let episodes: BTreeSet<u32> = if item.watched_episodes.is_season_complete(number, season.episode_count) {
        BTreeSet::new()
    } else {
        (1..=season.episode_count).collect()
    };
    item.watched_episodes.set_season(number, episodes);

    item.status = item.status.after_progress();
    item.current_season = Some(number);
    item.current_episode = (season.episode_count > 0).then_some(season.episode_count);
    item
}
