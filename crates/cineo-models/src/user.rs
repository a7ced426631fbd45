use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::media::ContentId;
use crate::watch_history::WatchHistoryItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Persisted user document: profile fields plus the full watch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Argon2 PHC string, never the password itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub watch_history: BTreeMap<ContentId, WatchHistoryItem>,
}

impl User {
    pub fn new(id: String, username: String) -> Self {
        Self {
            id,
            username,
            email: String::new(),
            phone: String::new(),
            avatar: None,
            role: Role::User,
            password_hash: None,
            watch_history: BTreeMap::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::WatchStatus;

    #[test]
    fn test_parses_document_with_numeric_history_keys() {
        let json = r#"{
            "id": "k2x9a",
            "username": "nigar",
            "email": "nigar@example.com",
            "phone": "+994",
            "role": "user",
            "watchHistory": {
                "603": {
                    "status": "watched",
                    "media_type": "movie",
                    "genres": [28],
                    "addedAt": 1700000000000,
                    "title": "The Matrix",
                    "poster": "/matrix.jpg"
                }
            }
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.watch_history.len(), 1);
        assert_eq!(user.watch_history[&603].title, "The Matrix");
        assert!(!user.is_admin());
        assert_eq!(user.watch_history[&603].status, WatchStatus::Watched);
    }

    #[test]
    fn test_password_hash_is_omitted_when_absent() {
        let user = User::new("u1".to_string(), "elvin".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
    }
}
