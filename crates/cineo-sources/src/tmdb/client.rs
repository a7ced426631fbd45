use crate::error::SourceError;
use crate::tmdb::api::{RawDetails, RawListing, RawPersonCredits, RawSeason};
use crate::tmdb::{image_url, ImageSize};
use crate::traits::MetadataProvider;
use async_trait::async_trait;
use cineo_config::TmdbConfig;
use cineo_models::{ContentDetails, ContentId, ContentSummary, Language, MediaKind, PersonId, SeasonDetails};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Credits kept for one cast member
const PERSON_CREDITS_LIMIT: usize = 24;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    api_base: String,
    image_base: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_base: String, image_base: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            image_base,
        }
    }

    /// Build from config; `api_key_override` (from the credential store) wins over the file
    pub fn from_config(config: &TmdbConfig, api_key_override: Option<&str>) -> Self {
        let api_key = api_key_override.unwrap_or(&config.api_key).to_string();
        Self::new(api_key, config.api_base.clone(), config.image_base.clone())
    }

    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        image_url(&self.image_base, path, size)
    }

    fn url(&self, path: &str, lang: Language, extra: &str) -> String {
        format!(
            "{}/{}?api_key={}&language={}{}",
            self.api_base,
            path,
            self.api_key,
            lang.provider_locale(),
            extra
        )
    }

    /// GET and decode. A 404 is reported as `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Option<T>, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("TMDB: {} not found", what);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("TMDB: failed to fetch {}: {} - {}", what, status, body);
            return Err(SourceError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    type Error = SourceError;

    fn provider_name(&self) -> &str {
        "tmdb"
    }

    async fn trending(&self, lang: Language) -> Result<Vec<ContentSummary>, Self::Error> {
        let url = self.url("trending/all/day", lang, "");
        let listing: Option<RawListing> = self.get_json(&url, "trending").await?;
        let summaries = listing.map(RawListing::into_summaries).unwrap_or_default();
        debug!("TMDB: trending returned {} titles", summaries.len());
        Ok(summaries)
    }

    async fn details(
        &self,
        id: ContentId,
        kind: MediaKind,
        lang: Language,
    ) -> Result<Option<ContentDetails>, Self::Error> {
        // Videos in English are requested too, so trailers show up for every UI language
        let extra = format!(
            "&append_to_response=credits,recommendations,videos&include_video_language=en,{}",
            lang.as_str()
        );
        let url = self.url(&format!("{}/{}", kind.provider_tag(), id), lang, &extra);
        let raw: Option<RawDetails> = self.get_json(&url, &format!("{} {}", kind, id)).await?;
        Ok(raw.and_then(RawDetails::into_details))
    }

    async fn season_details(
        &self,
        series_id: ContentId,
        season_number: u32,
        lang: Language,
    ) -> Result<SeasonDetails, Self::Error> {
        let url = self.url(&format!("tv/{}/season/{}", series_id, season_number), lang, "");
        let what = format!("season {} of series {}", season_number, series_id);
        let raw: Option<RawSeason> = self.get_json(&url, &what).await?;
        raw.map(RawSeason::into_season)
            .ok_or_else(|| SourceError::new(format!("TMDB has no {}", what)))
    }

    async fn search(&self, query: &str, lang: Language) -> Result<Vec<ContentSummary>, Self::Error> {
        let extra = format!("&query={}", urlencoding::encode(query));
        let url = self.url("search/multi", lang, &extra);
        let listing: Option<RawListing> = self.get_json(&url, "search results").await?;
        let summaries = listing.map(RawListing::into_summaries).unwrap_or_default();
        debug!("TMDB: search '{}' returned {} titles", query, summaries.len());
        Ok(summaries)
    }

    async fn person_credits(&self, person_id: PersonId, lang: Language) -> Result<Vec<ContentSummary>, Self::Error> {
        let url = self.url(&format!("person/{}/combined_credits", person_id), lang, "");
        let what = format!("credits of person {}", person_id);
        let credits: Option<RawPersonCredits> = self.get_json(&url, &what).await?;
        Ok(credits
            .map(|c| c.into_summaries(PERSON_CREDITS_LIMIT))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = TmdbClient::new(
            "k".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            "https://image.tmdb.org/t/p".to_string(),
        );
        assert_eq!(
            client.url("tv/1399/season/1", Language::Ru, ""),
            "https://api.themoviedb.org/3/tv/1399/season/1?api_key=k&language=ru-RU"
        );
    }

    #[test]
    fn test_api_key_override() {
        let config = TmdbConfig {
            api_key: "from_file".to_string(),
            ..TmdbConfig::default()
        };
        let client = TmdbClient::from_config(&config, Some("from_credentials"));
        assert_eq!(client.api_key, "from_credentials");
        let client = TmdbClient::from_config(&config, None);
        assert_eq!(client.api_key, "from_file");
    }
}
