use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque numeric key in the metadata provider's namespace
pub type ContentId = u64;

/// Provider key of a cast member
pub type PersonId = u64;

/// Whether a content identifier refers to a single work or an episodic one.
///
/// Serialized with the provider's own tags (`movie` / `tv`) so persisted
/// user documents stay compatible with the provider's vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Film,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Film => Self::Series,
            Self::Series => Self::Film,
        }
    }

    /// Path segment used by the provider's REST endpoints
    pub fn provider_tag(self) -> &'static str {
        match self {
            Self::Film => "movie",
            Self::Series => "tv",
        }
    }

    /// Parse the provider's `media_type` tag. Unknown tags (e.g. `person`) yield `None`.
    pub fn from_provider_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(Self::Film),
            "tv" => Some(Self::Series),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "film" | "movie" => Ok(Self::Film),
            "series" | "tv" | "show" => Ok(Self::Series),
            other => Err(format!("Invalid media kind: {}. Use 'film' or 'series'", other)),
        }
    }
}

/// How a kind was learned for a content identifier.
///
/// `Tagged` comes from an explicit `media_type` field (or a caller hint) and
/// is authoritative. `Shape` is inferred from which title field a payload
/// carried (`title` for films, `name` for series).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum KindEvidence {
    Tagged(MediaKind),
    Shape(MediaKind),
}

impl KindEvidence {
    pub fn kind(self) -> MediaKind {
        match self {
            Self::Tagged(kind) | Self::Shape(kind) => kind,
        }
    }
}
