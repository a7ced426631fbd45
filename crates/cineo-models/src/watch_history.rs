use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use crate::media::MediaKind;
use crate::status::WatchStatus;

/// Per-season sets of watched episode numbers.
///
/// A season that was reset keeps its key with an empty set, so callers can
/// tell "touched and cleared" apart from "never touched".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct WatchedEpisodes(BTreeMap<u32, BTreeSet<u32>>);

impl WatchedEpisodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn season(&self, season_number: u32) -> Option<&BTreeSet<u32>> {
        self.0.get(&season_number)
    }

    /// Number of watched episodes recorded for a season (0 when untouched)
    pub fn season_len(&self, season_number: u32) -> usize {
        self.0.get(&season_number).map_or(0, BTreeSet::len)
    }

    pub fn contains(&self, season_number: u32, episode_number: u32) -> bool {
        self.0
            .get(&season_number)
            .is_some_and(|episodes| episodes.contains(&episode_number))
    }

    /// Flip membership of one episode. Returns `true` if it is now watched.
    pub fn toggle(&mut self, season_number: u32, episode_number: u32) -> bool {
        let episodes = self.0.entry(season_number).or_default();
        if episodes.remove(&episode_number) {
            false
        } else {
            episodes.insert(episode_number);
            true
        }
    }

    /// Replace a season's set wholesale
    pub fn set_season(&mut self, season_number: u32, episodes: BTreeSet<u32>) {
        self.0.insert(season_number, episodes);
    }

    /// Completeness check by size only, matching how the season button decides fill vs reset
    pub fn is_season_complete(&self, season_number: u32, episode_count: u32) -> bool {
        self.season_len(season_number) == episode_count as usize
    }

    /// Total watched episodes across all seasons
    pub fn total(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &BTreeSet<u32>)> {
        self.0.iter()
    }
}

impl<const N: usize> From<[(u32, Vec<u32>); N]> for WatchedEpisodes {
    fn from(seasons: [(u32, Vec<u32>); N]) -> Self {
        Self(
            seasons
                .into_iter()
                .map(|(season, episodes)| (season, episodes.into_iter().collect()))
                .collect(),
        )
    }
}

/// A user's relationship to one title.
///
/// Field names on the wire match the persisted user documents
/// (`media_type`, `addedAt`, `poster`, `watchedEpisodes`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub status: WatchStatus,
    /// Fixed when the record is created
    #[serde(rename = "media_type")]
    pub media_kind: MediaKind,
    #[serde(default)]
    pub genres: Vec<u32>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    /// Set once at first interaction (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "poster", default)]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_episode: Option<u32>,
    #[serde(default, skip_serializing_if = "WatchedEpisodes::is_empty")]
    pub watched_episodes: WatchedEpisodes,
}

impl WatchHistoryItem {
    /// Short "S2 E5" label for the position pointer, when one is set
    pub fn position_label(&self) -> Option<String> {
        match (self.current_season, self.current_episode) {
            (Some(season), Some(episode)) => Some(format!("S{} E{}", season, episode)),
            (Some(season), None) => Some(format!("S{}", season)),
            _ => None,
        }
    }
}
