use async_trait::async_trait;
use cineo_models::{ContentDetails, ContentId, ContentSummary, Language, MediaKind, PersonId, SeasonDetails};

/// Read-only access to the movie/TV metadata provider.
///
/// Implementations convert raw payloads into tagged domain values, so
/// callers never inspect which optional fields a response carried.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static + std::fmt::Display;

    fn provider_name(&self) -> &str;

    async fn trending(&self, lang: Language) -> Result<Vec<ContentSummary>, Self::Error>;

    /// `Ok(None)` when the provider has nothing for `id` under `kind`
    async fn details(
        &self,
        id: ContentId,
        kind: MediaKind,
        lang: Language,
    ) -> Result<Option<ContentDetails>, Self::Error>;

    async fn season_details(
        &self,
        series_id: ContentId,
        season_number: u32,
        lang: Language,
    ) -> Result<SeasonDetails, Self::Error>;

    async fn search(&self, query: &str, lang: Language) -> Result<Vec<ContentSummary>, Self::Error>;

    /// Films and series a cast member appeared in, most popular first
    async fn person_credits(&self, person_id: PersonId, lang: Language) -> Result<Vec<ContentSummary>, Self::Error>;
}
