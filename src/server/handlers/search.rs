//! Keyword search over the caller's chat history.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::{ApiError, ApiResult};
use crate::storage::chats::{self, ChatFilter};
use crate::storage::models::{Chat, SearchRecord};
use crate::storage::searches;

/// How many trailing messages each result carries as a preview.
const PREVIEW_MESSAGES: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// `POST /search`
pub async fn perform_search(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Json<Value>> {
    let filter = ChatFilter {
        chat_id: req.chat_id,
        date_from: parse_date(req.date_from.as_deref(), "date_from")?,
        date_to: parse_date(req.date_to.as_deref(), "date_to")?,
    };

    let candidates = state
        .db
        .with_conn(|conn| chats::chats_filtered(conn, user.id, &filter))?;

    let results: Vec<Value> = candidates
        .iter()
        .filter(|chat| matches_query(chat, &req.query))
        .map(|chat| {
            let preview_start = chat.messages.len().saturating_sub(PREVIEW_MESSAGES);
            json!({
                "id": chat.id,
                "created_at": chat.created_at.to_rfc3339(),
                "messages": &chat.messages[preview_start..],
            })
        })
        .collect();

    let snapshot = json!({ "results": results });
    state
        .db
        .with_conn(|conn| searches::insert_search(conn, user.id, &req.query, &snapshot))?;

    Ok(Json(snapshot))
}

/// `GET /search/history`
pub async fn search_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<SearchRecord>>> {
    let history = state
        .db
        .with_conn(|conn| searches::searches_for_user(conn, user.id))?;
    Ok(Json(history))
}

/// Case-insensitive substring match over a chat's message contents. An
/// empty query matches every chat.
fn matches_query(chat: &Chat, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    chat.messages
        .iter()
        .any(|m| m.content.to_lowercase().contains(&needle))
}

fn parse_date(raw: Option<&str>, field: &str) -> ApiResult<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| ApiError::bad_request(format!("Invalid {field}: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::ChatMessage;

    fn chat_with(content: &str) -> Chat {
        Chat {
            id: 1,
            user_id: 1,
            project_id: None,
            messages: vec![ChatMessage::user(content)],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_query_case_insensitive() {
        let chat = chat_with("Hello WORLD");
        assert!(matches_query(&chat, "world"));
        assert!(matches_query(&chat, "HELLO"));
        assert!(!matches_query(&chat, "rust"));
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(matches_query(&chat_with("anything"), ""));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date(None, "date_from").unwrap().is_none());
        assert!(parse_date(Some("2026-01-01T00:00:00Z"), "date_from")
            .unwrap()
            .is_some());
        assert!(parse_date(Some("not-a-date"), "date_from").is_err());
    }
}
