use cineo_models::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Built-in administrator account, checked before the user store
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
    #[serde(default)]
    pub language: Language,
}

/// What the sync gateway writes after each reconciled change
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Write the whole user document
    #[default]
    FullUser,
    /// Write only the changed history record keyed by user and content id
    SingleRecord,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: SyncMode,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Force JSON (true) or plain (false) output; unset picks by terminal detection
    #[serde(default)]
    pub json: Option<bool>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub email: String,
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            image_base: default_image_base(),
            language: Language::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            mode: SyncMode::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: None,
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_tmdb_configured() {
            return Err(anyhow::anyhow!("tmdb.api_key is required and cannot be empty"));
        }
        if self.search.debounce_ms == 0 {
            return Err(anyhow::anyhow!("search.debounce_ms must be greater than zero"));
        }
        if let Some(ref admin) = self.admin {
            if admin.username.trim().is_empty() {
                return Err(anyhow::anyhow!("admin.username cannot be empty"));
            }
            if !admin.password_hash.starts_with("$argon2") {
                return Err(anyhow::anyhow!("admin.password_hash must be an Argon2 PHC string"));
            }
        }
        Ok(())
    }

    pub fn is_tmdb_configured(&self) -> bool {
        !self.tmdb.api_key.is_empty() && self.tmdb.api_key != "YOUR_API_KEY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            tmdb: TmdbConfig {
                api_key: "test_key".to_string(),
                language: Language::Ru,
                ..TmdbConfig::default()
            },
            sync: SyncConfig {
                enabled: true,
                mode: SyncMode::SingleRecord,
            },
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
            admin: None,
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tmdb.api_key, "test_key");
        assert_eq!(loaded.tmdb.language, Language::Ru);
        assert_eq!(loaded.sync.mode, SyncMode::SingleRecord);
        assert_eq!(loaded.search.debounce_ms, 500);
    }

    #[test]
    fn test_defaults_from_minimal_file() {
        let config: Config = toml::from_str("[tmdb]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.tmdb.api_base, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.language, Language::Az);
        assert!(config.sync.enabled);
        assert_eq!(config.sync.mode, SyncMode::FullUser);
        assert_eq!(config.search.min_query_len, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        assert!(!config.is_tmdb_configured());

        config.tmdb.api_key = "YOUR_API_KEY".to_string();
        assert!(config.validate().is_err());

        config.tmdb.api_key = "real_key".to_string();
        assert!(config.validate().is_ok());

        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());
        config.search.debounce_ms = 300;

        config.admin = Some(AdminConfig {
            username: "root".to_string(),
            password_hash: "plain".to_string(),
            email: String::new(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert!(config.tmdb.api_key.is_empty());
    }
}
