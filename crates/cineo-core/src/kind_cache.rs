use std::collections::HashMap;
use cineo_models::{ContentId, ContentSummary, KindEvidence, MediaKind};

/// Session-lifetime map from content id to the best known kind evidence.
///
/// Tagged evidence (an explicit `media_type`, a caller hint or a successful
/// details fetch) always replaces what is stored. Shape evidence only fills
/// gaps and refreshes earlier shape evidence, it never displaces a tag.
#[derive(Debug, Default)]
pub struct KindCache {
    by_id: HashMap<ContentId, KindEvidence>,
}

impl KindCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ContentId, evidence: KindEvidence) {
        match (self.by_id.get(&id), evidence) {
            (Some(KindEvidence::Tagged(_)), KindEvidence::Shape(_)) => {}
            _ => {
                self.by_id.insert(id, evidence);
            }
        }
    }

    /// Record an authoritative kind
    pub fn record_tag(&mut self, id: ContentId, kind: MediaKind) {
        self.record(id, KindEvidence::Tagged(kind));
    }

    /// Harvest kinds from every entry of a listing or search result
    pub fn observe<'a, I>(&mut self, summaries: I)
    where
        I: IntoIterator<Item = &'a ContentSummary>,
    {
        for summary in summaries {
            if let Some(evidence) = summary.kind {
                self.record(summary.id, evidence);
            }
        }
    }

    pub fn lookup(&self, id: ContentId) -> Option<KindEvidence> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
