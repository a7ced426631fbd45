use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use cineo_config::SearchConfig;
use cineo_models::{ContentSummary, Language};
use cineo_sources::SourceError;
use tracing::debug;
use crate::kind_resolver::SharedProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// Query too short, results should be cleared
    Cleared,
    Results(Vec<ContentSummary>),
    /// A newer query started, this one's results were dropped
    Superseded,
}

/// Search-as-you-type with a debounce window.
///
/// Every call takes a new generation number. A call whose generation is no
/// longer current after the debounce, or after its request returns, yields
/// `Superseded`. Requests already sent are not cancelled.
#[derive(Clone)]
pub struct DebouncedSearch {
    provider: SharedProvider,
    debounce: Duration,
    min_query_len: usize,
    generation: Arc<AtomicU64>,
}

impl DebouncedSearch {
    pub fn new(provider: SharedProvider, config: &SearchConfig) -> Self {
        Self {
            provider,
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn query(&self, text: &str, lang: Language) -> Result<SearchUpdate, SourceError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.trim();
        if text.chars().count() < self.min_query_len {
            return Ok(SearchUpdate::Cleared);
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(generation) {
            debug!("Search for {:?} superseded during debounce", text);
            return Ok(SearchUpdate::Superseded);
        }

        let results = self.provider.search(text, lang).await?;
        if !self.is_current(generation) {
            debug!("Search for {:?} superseded while in flight, dropping {} results", text, results.len());
            return Ok(SearchUpdate::Superseded);
        }
        Ok(SearchUpdate::Results(results))
    }
}
