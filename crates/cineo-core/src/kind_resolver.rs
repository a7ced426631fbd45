use std::collections::HashSet;
use std::sync::Arc;
use cineo_models::{ContentDetails, ContentId, ContentSummary, KindEvidence, Language, MediaKind};
use cineo_sources::{MetadataProvider, SourceError};
use tracing::{debug, warn};
use crate::error::TrackError;
use crate::kind_cache::KindCache;

pub type SharedProvider = Arc<dyn MetadataProvider<Error = SourceError>>;

/// Works out whether a bare content id names a film or a series.
///
/// Resolution order:
/// 1. a hint from the caller, recorded as a tag
/// 2. the session cache (tags from listings, then payload shape)
/// 3. a details lookup guessing film, retried once as a series
///
/// Films and series have separate id spaces on TMDB, so a blind film guess
/// that the provider accepts may still be the wrong title. Such ids stay
/// "unconfirmed" until a hint or a tag says otherwise.
pub struct KindResolver {
    provider: SharedProvider,
    cache: KindCache,
    unconfirmed: HashSet<ContentId>,
    lang: Language,
}

impl KindResolver {
    pub fn new(provider: SharedProvider, lang: Language) -> Self {
        Self {
            provider,
            cache: KindCache::new(),
            unconfirmed: HashSet::new(),
            lang,
        }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// Feed a listing or search result through the cache
    pub fn observe(&mut self, summaries: &[ContentSummary]) {
        self.cache.observe(summaries);
        for summary in summaries {
            if let Some(KindEvidence::Tagged(_)) = summary.kind {
                self.unconfirmed.remove(&summary.id);
            }
        }
        debug!("Kind cache: observed {} entries, {} known", summaries.len(), self.cache.len());
    }

    pub fn hint(&mut self, id: ContentId, kind: MediaKind) {
        self.unconfirmed.remove(&id);
        self.cache.record_tag(id, kind);
    }

    /// True when the kind of `id` is only the default film guess, accepted
    /// by the provider before the series lookup was tried
    pub fn is_unconfirmed(&self, id: ContentId) -> bool {
        self.unconfirmed.contains(&id)
    }

    /// Kind from the cache alone, without touching the provider
    pub fn known_kind(&self, id: ContentId) -> Option<MediaKind> {
        self.cache.lookup(id).map(KindEvidence::kind)
    }

    pub fn evidence(&self, id: ContentId) -> Option<KindEvidence> {
        self.cache.lookup(id)
    }

    pub async fn resolve_kind(&mut self, id: ContentId, hint: Option<MediaKind>) -> Result<MediaKind, TrackError> {
        if let Some(kind) = hint {
            self.hint(id, kind);
            return Ok(kind);
        }
        if let Some(evidence) = self.cache.lookup(id) {
            debug!("Kind resolver: {} is {} ({:?}, cached)", id, evidence.kind(), evidence);
            return Ok(evidence.kind());
        }
        debug!("Kind resolver: cache miss for {}, querying provider", id);
        let details = self.fetch_with_fallback(id, MediaKind::Film, true).await?;
        Ok(details.kind())
    }

    /// Load full details the way the details view does: guess from what is
    /// known, fall back to the other kind, cache whichever kind answered.
    /// Recommendations in the payload are harvested like any other listing.
    pub async fn load_details(&mut self, id: ContentId, hint: Option<MediaKind>) -> Result<ContentDetails, TrackError> {
        if let Some(kind) = hint {
            self.hint(id, kind);
        }
        match self.known_kind(id) {
            Some(kind) => self.fetch_with_fallback(id, kind, false).await,
            None => self.fetch_with_fallback(id, MediaKind::Film, true).await,
        }
    }

    async fn fetch_with_fallback(
        &mut self,
        id: ContentId,
        guess: MediaKind,
        blind: bool,
    ) -> Result<ContentDetails, TrackError> {
        for kind in [guess, guess.opposite()] {
            match self.provider.details(id, kind, self.lang).await {
                Ok(Some(details)) => {
                    if details.kind() != guess {
                        debug!("Kind resolver: {} answered as {} after guessing {}", id, details.kind(), guess);
                    }
                    self.cache.observe(details.recommendations());
                    self.cache.record_tag(id, details.kind());
                    if blind && kind == guess {
                        debug!("Kind resolver: {} accepted as {} on a blind guess", id, kind);
                        self.unconfirmed.insert(id);
                    } else {
                        self.unconfirmed.remove(&id);
                    }
                    return Ok(details);
                }
                Ok(None) => {
                    debug!("Kind resolver: {} has no {} details on {}", id, kind, self.provider.provider_name());
                }
                Err(e) => {
                    warn!("Kind resolver: {} details lookup for {} failed: {}", kind, id, e);
                }
            }
        }
        warn!("Kind resolver: {} resolved as neither film nor series", id);
        Err(TrackError::NotFound(id))
    }
}
