use serde::{Deserialize, Serialize};
use crate::media::{ContentId, KindEvidence, MediaKind, PersonId};

/// One entry of a trending or search listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentSummary {
    pub id: ContentId,
    /// `None` when the payload carried neither a kind tag nor a title field
    pub kind: Option<KindEvidence>,
    pub title: String,
    pub poster_path: Option<String>,
    pub genre_ids: Vec<u32>,
    pub origin_country: Vec<String>,
    pub vote_average: f32,
    /// Release date for films, first air date for series
    pub date: Option<String>,
}

impl ContentSummary {
    /// Snapshot for status changes made straight from a listing
    pub fn snapshot(&self) -> Option<ContentSnapshot> {
        let kind = self.kind?.kind();
        Some(ContentSnapshot {
            id: self.id,
            kind,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            genres: self.genre_ids.clone(),
            countries: self.origin_country.clone(),
            runtime: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// YouTube video shown as the title's trailer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trailer {
    pub key: String,
    pub name: String,
}

impl Trailer {
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmDetails {
    pub id: ContentId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Vec<Genre>,
    pub production_countries: Vec<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: f32,
    pub status: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub recommendations: Vec<ContentSummary>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesDetails {
    pub id: ContentId,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Vec<Genre>,
    pub origin_country: Vec<String>,
    pub first_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub vote_average: f32,
    pub status: Option<String>,
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub recommendations: Vec<ContentSummary>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

impl SeriesDetails {
    pub fn season(&self, season_number: u32) -> Option<&SeasonSummary> {
        self.seasons.iter().find(|s| s.season_number == season_number)
    }

    /// Regular seasons only (season 0 holds specials)
    pub fn regular_seasons(&self) -> impl Iterator<Item = &SeasonSummary> {
        self.seasons.iter().filter(|s| s.season_number > 0)
    }
}

/// Details payload, already discriminated by kind at the provider boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ContentDetails {
    Film(FilmDetails),
    Series(SeriesDetails),
}

impl ContentDetails {
    pub fn id(&self) -> ContentId {
        match self {
            Self::Film(film) => film.id,
            Self::Series(series) => series.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Film(_) => MediaKind::Film,
            Self::Series(_) => MediaKind::Series,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Film(film) => &film.title,
            Self::Series(series) => &series.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            Self::Film(film) => &film.overview,
            Self::Series(series) => &series.overview,
        }
    }

    /// Billed cast, in provider order
    pub fn cast(&self) -> &[CastMember] {
        match self {
            Self::Film(film) => &film.cast,
            Self::Series(series) => &series.cast,
        }
    }

    pub fn recommendations(&self) -> &[ContentSummary] {
        match self {
            Self::Film(film) => &film.recommendations,
            Self::Series(series) => &series.recommendations,
        }
    }

    pub fn trailer(&self) -> Option<&Trailer> {
        match self {
            Self::Film(film) => film.trailer.as_ref(),
            Self::Series(series) => series.trailer.as_ref(),
        }
    }

    pub fn as_series(&self) -> Option<&SeriesDetails> {
        match self {
            Self::Series(series) => Some(series),
            Self::Film(_) => None,
        }
    }

    /// The fields a watch-history record copies from the provider
    pub fn snapshot(&self) -> ContentSnapshot {
        match self {
            Self::Film(film) => ContentSnapshot {
                id: film.id,
                kind: MediaKind::Film,
                title: film.title.clone(),
                poster_path: film.poster_path.clone(),
                genres: film.genres.iter().map(|g| g.id).collect(),
                countries: film.production_countries.clone(),
                runtime: film.runtime,
            },
            Self::Series(series) => ContentSnapshot {
                id: series.id,
                kind: MediaKind::Series,
                title: series.name.clone(),
                poster_path: series.poster_path.clone(),
                genres: series.genres.iter().map(|g| g.id).collect(),
                countries: series.origin_country.clone(),
                runtime: None,
            },
        }
    }
}

/// Display and tagging fields captured from the latest provider payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentSnapshot {
    pub id: ContentId,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub genres: Vec<u32>,
    pub countries: Vec<String>,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub episode_count: u32,
    pub name: String,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub episode_number: u32,
    pub name: String,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub vote_average: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonDetails {
    pub season_number: u32,
    pub name: String,
    pub air_date: Option<String>,
    pub episodes: Vec<Episode>,
}

impl SeasonDetails {
    /// Season summary with the episode count taken from the loaded episode list
    pub fn summary(&self) -> SeasonSummary {
        SeasonSummary {
            season_number: self.season_number,
            episode_count: self.episodes.len() as u32,
            name: self.name.clone(),
            air_date: self.air_date.clone(),
        }
    }
}
