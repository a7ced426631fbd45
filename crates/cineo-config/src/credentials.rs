use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Small key/value file holding the signed-in session and secrets that
/// should not live in `config.toml`
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    // Session
    pub fn get_current_user_id(&self) -> Option<&String> {
        self.get("current_user_id")
    }

    pub fn get_signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.get("signed_in_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn set_current_user(&mut self, user_id: String, signed_in_at: DateTime<Utc>) {
        self.set("current_user_id".to_string(), user_id);
        self.set("signed_in_at".to_string(), signed_in_at.to_rfc3339());
    }

    pub fn clear_current_user(&mut self) {
        self.remove("current_user_id");
        self.remove("signed_in_at");
    }

    // Metadata provider
    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get("tmdb_api_key")
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set("tmdb_api_key".to_string(), key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_tmdb_api_key("test_key".to_string());
        store.set_current_user("u-1".to_string(), Utc::now());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_tmdb_api_key(), Some(&"test_key".to_string()));
        assert_eq!(loaded_store.get_current_user_id(), Some(&"u-1".to_string()));
    }

    #[test]
    fn test_credential_store_signed_in_at() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        let signed_in = Utc::now();
        store.set_current_user("u-2".to_string(), signed_in);
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        let loaded = loaded_store.get_signed_in_at().unwrap();
        // Allow 1 second difference for serialization
        assert!((loaded - signed_in).num_seconds().abs() < 2);
    }

    #[test]
    fn test_clear_current_user() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_current_user("u-3".to_string(), Utc::now());
        store.set_tmdb_api_key("key".to_string());

        store.clear_current_user();
        assert_eq!(store.get_current_user_id(), None);
        assert_eq!(store.get_signed_in_at(), None);
        assert_eq!(store.get_tmdb_api_key(), Some(&"key".to_string()));
    }
}
