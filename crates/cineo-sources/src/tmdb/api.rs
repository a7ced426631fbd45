use cineo_models::{
    CastMember, ContentDetails, ContentSummary, Episode, FilmDetails, Genre, KindEvidence,
    MediaKind, SeasonDetails, SeasonSummary, SeriesDetails, Trailer,
};
use serde::Deserialize;

// Raw TMDB payloads. Films carry `title`/`release_date`, series carry
// `name`/`first_air_date`; listings from /trending and /search/multi may also
// carry an explicit `media_type`. Everything is optional on the wire.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawListing {
    #[serde(default)]
    pub results: Vec<RawSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSummary {
    pub id: u64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f32,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
}

/// `/person/{id}/combined_credits`; only the acting credits are read
#[derive(Debug, Deserialize)]
pub(crate) struct RawPersonCredits {
    #[serde(default)]
    pub cast: Vec<RawSummary>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    id: u32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    iso_3166_1: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawCredits {
    #[serde(default)]
    cast: Vec<RawCastMember>,
}

#[derive(Debug, Deserialize)]
struct RawCastMember {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    character: String,
    profile_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVideos {
    #[serde(default)]
    results: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    video_type: String,
}

#[derive(Debug, Deserialize)]
struct RawSeasonSummary {
    season_number: u32,
    #[serde(default)]
    episode_count: u32,
    #[serde(default)]
    name: String,
    air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetails {
    pub id: Option<u64>,
    /// Present (and false) on provider error bodies
    pub success: Option<bool>,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<RawGenre>,
    #[serde(default)]
    production_countries: Vec<RawCountry>,
    #[serde(default)]
    origin_country: Vec<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    vote_average: f32,
    status: Option<String>,
    #[serde(default)]
    seasons: Vec<RawSeasonSummary>,
    #[serde(default)]
    credits: RawCredits,
    #[serde(default)]
    recommendations: RawListing,
    #[serde(default)]
    videos: RawVideos,
}

#[derive(Debug, Deserialize)]
struct RawEpisode {
    episode_number: u32,
    #[serde(default)]
    name: String,
    air_date: Option<String>,
    still_path: Option<String>,
    #[serde(default)]
    vote_average: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSeason {
    season_number: u32,
    #[serde(default)]
    name: String,
    air_date: Option<String>,
    #[serde(default)]
    episodes: Vec<RawEpisode>,
}

/// Non-empty string or nothing
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

impl RawSummary {
    /// Explicit `media_type` wins; otherwise infer from which title field is present
    fn kind_evidence(&self) -> Option<KindEvidence> {
        if let Some(kind) = self.media_type.as_deref().and_then(MediaKind::from_provider_tag) {
            return Some(KindEvidence::Tagged(kind));
        }
        if present(&self.title) {
            Some(KindEvidence::Shape(MediaKind::Film))
        } else if present(&self.name) {
            Some(KindEvidence::Shape(MediaKind::Series))
        } else {
            None
        }
    }

    /// Entries tagged with a non-title media type (people) are not content
    fn is_content(&self) -> bool {
        match self.media_type.as_deref() {
            Some(tag) => MediaKind::from_provider_tag(tag).is_some(),
            None => true,
        }
    }

    pub(crate) fn into_summary(self) -> Option<ContentSummary> {
        if !self.is_content() {
            return None;
        }
        let kind = self.kind_evidence();
        let date = match kind.map(KindEvidence::kind) {
            Some(MediaKind::Series) => self.first_air_date.or(self.release_date),
            _ => self.release_date.or(self.first_air_date),
        };
        Some(ContentSummary {
            id: self.id,
            kind,
            title: self
                .title
                .filter(|t| !t.is_empty())
                .or(self.name)
                .unwrap_or_else(|| "Untitled".to_string()),
            poster_path: self.poster_path,
            genre_ids: self.genre_ids,
            origin_country: self.origin_country,
            vote_average: self.vote_average,
            date,
        })
    }
}

impl RawListing {
    pub(crate) fn into_summaries(self) -> Vec<ContentSummary> {
        self.results.into_iter().filter_map(RawSummary::into_summary).collect()
    }
}

impl RawPersonCredits {
    /// Most popular credits first, at most `limit`
    pub(crate) fn into_summaries(mut self, limit: usize) -> Vec<ContentSummary> {
        self.cast.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        self.cast
            .into_iter()
            .filter_map(RawSummary::into_summary)
            .take(limit)
            .collect()
    }
}

impl RawVideos {
    /// YouTube trailer, else teaser, else clip, else any YouTube video
    fn trailer(self) -> Option<Trailer> {
        let rank = |v: &RawVideo| match v.video_type.as_str() {
            "Trailer" => 0,
            "Teaser" => 1,
            "Clip" => 2,
            _ => 3,
        };
        self.results
            .into_iter()
            .filter(|v| v.site == "YouTube")
            .enumerate()
            .min_by_key(|(i, v)| (rank(v), *i))
            .map(|(_, v)| Trailer { key: v.key, name: v.name })
    }
}

impl RawDetails {
    /// Discriminate the payload by shape. Error bodies, payloads without an id
    /// and payloads with neither `title` nor `name` are treated as not found.
    pub(crate) fn into_details(self) -> Option<ContentDetails> {
        if self.success == Some(false) {
            return None;
        }
        let id = self.id?;
        let cast: Vec<CastMember> = self
            .credits
            .cast
            .into_iter()
            .map(|c| CastMember {
                id: c.id,
                name: c.name,
                character: c.character,
                profile_path: c.profile_path,
            })
            .collect();
        let recommendations = self.recommendations.into_summaries();
        let trailer = self.videos.trailer();
        let genres = self
            .genres
            .into_iter()
            .map(|g| Genre { id: g.id, name: g.name })
            .collect();

        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            return Some(ContentDetails::Film(FilmDetails {
                id,
                title,
                overview: self.overview,
                poster_path: self.poster_path,
                backdrop_path: self.backdrop_path,
                genres,
                production_countries: self
                    .production_countries
                    .into_iter()
                    .map(|c| c.iso_3166_1)
                    .collect(),
                release_date: self.release_date,
                runtime: self.runtime,
                vote_average: self.vote_average,
                status: self.status,
                cast,
                recommendations,
                trailer,
            }));
        }

        let name = self.name.filter(|n| !n.is_empty())?;
        Some(ContentDetails::Series(SeriesDetails {
            id,
            name,
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            genres,
            origin_country: self.origin_country,
            first_air_date: self.first_air_date,
            number_of_seasons: self.number_of_seasons,
            number_of_episodes: self.number_of_episodes,
            vote_average: self.vote_average,
            status: self.status,
            seasons: self
                .seasons
                .into_iter()
                .map(|s| SeasonSummary {
                    season_number: s.season_number,
                    episode_count: s.episode_count,
                    name: s.name,
                    air_date: s.air_date,
                })
                .collect(),
            cast,
            recommendations,
            trailer,
        }))
    }
}

impl RawSeason {
    pub(crate) fn into_season(self) -> SeasonDetails {
        SeasonDetails {
            season_number: self.season_number,
            name: self.name,
            air_date: self.air_date,
            episodes: self
                .episodes
                .into_iter()
                .map(|e| Episode {
                    episode_number: e.episode_number,
                    name: e.name,
                    air_date: e.air_date,
                    still_path: e.still_path,
                    vote_average: e.vote_average,
                })
                .collect(),
        }
    }
}
