use std::collections::HashMap;
use cineo_models::{genre_name, MediaKind, WatchStatus};
use serde::Serialize;
use crate::history::WatchHistoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub id: u32,
    pub name: String,
    pub count: usize,
}

/// Profile page numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub watched: usize,
    pub watching: usize,
    pub planned: usize,
    pub episodes_watched: usize,
    /// Sum of known runtimes of watched films
    pub film_minutes: u64,
    /// Genres of watched titles, most frequent first
    pub genres: Vec<GenreCount>,
}

pub fn profile_stats(history: &WatchHistoryStore) -> ProfileStats {
    let mut stats = ProfileStats {
        watched: history.count(WatchStatus::Watched),
        watching: history.count(WatchStatus::Watching),
        planned: history.count(WatchStatus::Planned),
        ..ProfileStats::default()
    };

    let mut histogram: HashMap<u32, usize> = HashMap::new();
    for (_, item) in history.iter() {
        stats.episodes_watched += item.watched_episodes.total();
        if item.status != WatchStatus::Watched {
            continue;
        }
        for genre in &item.genres {
            *histogram.entry(*genre).or_default() += 1;
        }
        if item.media_kind == MediaKind::Film {
            stats.film_minutes += u64::from(item.runtime.unwrap_or(0));
        }
    }

    stats.genres = histogram
        .into_iter()
        .map(|(id, count)| GenreCount { id, name: genre_name(id).to_string(), count })
        .collect();
    stats.genres.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cineo_models::{User, WatchHistoryItem, WatchedEpisodes};

    fn item(status: WatchStatus, kind: MediaKind, genres: Vec<u32>, runtime: Option<u32>) -> WatchHistoryItem {
        WatchHistoryItem {
            status,
            media_kind: kind,
            genres,
            countries: Vec::new(),
            runtime,
            added_at: Utc::now(),
            title: "Title".to_string(),
            poster_path: None,
            current_season: None,
            current_episode: None,
            watched_episodes: WatchedEpisodes::new(),
        }
    }

    #[test]
    fn test_counts_and_genre_histogram() {
        let mut history = WatchHistoryStore::new(User::new("u1".to_string(), "nigar".to_string()));
        history.upsert(1, item(WatchStatus::Watched, MediaKind::Film, vec![28, 878], Some(136)));
        history.upsert(2, item(WatchStatus::Watched, MediaKind::Film, vec![28], Some(120)));
        history.upsert(3, item(WatchStatus::Watched, MediaKind::Series, vec![18], None));
        history.upsert(4, item(WatchStatus::Planned, MediaKind::Film, vec![35], Some(90)));
        let mut watching = item(WatchStatus::Watching, MediaKind::Series, vec![18], None);
        watching.watched_episodes = WatchedEpisodes::from([(1, vec![1, 2, 3]), (2, vec![1])]);
        history.upsert(5, watching);

        let stats = profile_stats(&history);
        assert_eq!((stats.watched, stats.watching, stats.planned), (3, 1, 1));
        assert_eq!(stats.episodes_watched, 4);
        assert_eq!(stats.film_minutes, 256);
        assert_eq!(
            stats.genres,
            vec![
                GenreCount { id: 28, name: "Action".to_string(), count: 2 },
                GenreCount { id: 18, name: "Drama".to_string(), count: 1 },
                GenreCount { id: 878, name: "Sci-Fi".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_history() {
        let history = WatchHistoryStore::new(User::new("u1".to_string(), "nigar".to_string()));
        assert_eq!(profile_stats(&history), ProfileStats::default());
    }
}
