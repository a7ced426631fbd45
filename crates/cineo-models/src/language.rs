use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface language, also used to localize provider responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Az,
    Ru,
    En,
}

impl Language {
    /// Locale code sent to the metadata provider
    pub fn provider_locale(self) -> &'static str {
        match self {
            Self::Az => "az-AZ",
            Self::Ru => "ru-RU",
            Self::En => "en-US",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Az => "az",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Unknown codes fall back to English, like the provider locale mapping
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "az" => Self::Az,
            "ru" => Self::Ru,
            _ => Self::En,
        })
    }
}
