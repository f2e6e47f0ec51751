//! Row types stored in the database and returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Salted hash, never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A project grouping chats and images.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One turn in a chat's message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "ai".
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a user turn stamped with the current time.
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build an AI turn stamped with the current time.
    pub fn ai<S: Into<String>>(content: S) -> Self {
        Self {
            role: "ai".to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation with its ordered message log.
#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub id: i64,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

/// An uploaded or generated image.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub id: i64,
    pub filename: String,
    pub path: String,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

/// A recorded search query with its result snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRecord {
    pub id: i64,
    pub query: String,
    pub user_id: i64,
    pub results: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Parse an RFC 3339 timestamp from a TEXT column.
pub(crate) fn parse_timestamp(
    column: usize,
    value: &str,
) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Parse a JSON TEXT column.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    column: usize,
    value: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "secret".to_string(),
            created_at: Utc::now(),
            is_active: true,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::user("hi").role, "user");
        assert_eq!(ChatMessage::ai("hello").role, "ai");
    }

    #[test]
    fn test_parse_timestamp_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(0, &now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }
}
