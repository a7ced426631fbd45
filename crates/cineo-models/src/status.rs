use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate user-facing viewing state of a tracked title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    #[default]
    None,
    /// Want to watch later
    Planned,
    /// Started (set automatically by episode and season toggles)
    Watching,
    /// Finished, only ever set explicitly by the user
    Watched,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Planned => "planned",
            Self::Watching => "watching",
            Self::Watched => "watched",
        }
    }

    /// Status after an episode or season toggle. Never regresses `Watched`.
    pub fn after_progress(self) -> Self {
        match self {
            Self::Watched => Self::Watched,
            _ => Self::Watching,
        }
    }

    pub const ALL: &[WatchStatus] = &[Self::None, Self::Planned, Self::Watching, Self::Watched];
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "planned" | "later" => Ok(Self::Planned),
            "watching" => Ok(Self::Watching),
            "watched" | "done" => Ok(Self::Watched),
            other => Err(format!(
                "Invalid status: {}. Use 'none', 'planned', 'watching' or 'watched'",
                other
            )),
        }
    }
}
