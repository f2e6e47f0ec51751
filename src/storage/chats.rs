//! Chat queries: CRUD, message log appends, and search filtering.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{KaisangError, Result};
use crate::storage::models::{Chat, ChatMessage, parse_json, parse_timestamp};

fn map_chat(row: &Row) -> rusqlite::Result<Chat> {
    Ok(Chat {
        id: row.get(0)?,
        user_id: row.get(1)?,
        project_id: row.get(2)?,
        messages: parse_json(3, &row.get::<_, String>(3)?)?,
        created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
    })
}

const CHAT_COLUMNS: &str = "id, user_id, project_id, messages, created_at";

/// Create an empty chat, optionally attached to a project.
pub fn insert_chat(conn: &Connection, user_id: i64, project_id: Option<i64>) -> Result<Chat> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO chats (user_id, project_id, messages, created_at) VALUES (?1, ?2, '[]', ?3)",
        params![user_id, project_id, created_at.to_rfc3339()],
    )?;
    Ok(Chat {
        id: conn.last_insert_rowid(),
        user_id,
        project_id,
        messages: Vec::new(),
        created_at,
    })
}

/// List all chats owned by a user.
pub fn chats_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Chat>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHAT_COLUMNS} FROM chats WHERE user_id = ?1 ORDER BY id"
    ))?;
    let chats = stmt
        .query_map(params![user_id], map_chat)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(chats)
}

/// Fetch a chat only if it belongs to the user.
pub fn chat_owned(conn: &Connection, user_id: i64, chat_id: i64) -> Result<Option<Chat>> {
    let chat = conn
        .query_row(
            &format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1 AND user_id = ?2"),
            params![chat_id, user_id],
            map_chat,
        )
        .optional()?;
    Ok(chat)
}

/// Delete an owned chat. Returns whether a row was removed.
pub fn delete_chat(conn: &Connection, user_id: i64, chat_id: i64) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM chats WHERE id = ?1 AND user_id = ?2",
        params![chat_id, user_id],
    )?;
    Ok(removed > 0)
}

/// Append turns to an owned chat's message log.
pub fn append_messages(
    conn: &Connection,
    user_id: i64,
    chat_id: i64,
    turns: &[ChatMessage],
) -> Result<Chat> {
    let mut chat = chat_owned(conn, user_id, chat_id)?
        .ok_or_else(|| KaisangError::not_found(format!("chat {chat_id}")))?;

    chat.messages.extend_from_slice(turns);
    let messages_json = serde_json::to_string(&chat.messages)?;
    conn.execute(
        "UPDATE chats SET messages = ?1 WHERE id = ?2 AND user_id = ?3",
        params![messages_json, chat_id, user_id],
    )?;
    Ok(chat)
}

/// Filters for chat history search.
#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    pub chat_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// List a user's chats matching the structural filters.
///
/// Keyword matching over message content happens in the caller; this only
/// narrows by ownership, chat id, and creation date.
pub fn chats_filtered(conn: &Connection, user_id: i64, filter: &ChatFilter) -> Result<Vec<Chat>> {
    use rusqlite::types::Value;

    let mut sql = format!("SELECT {CHAT_COLUMNS} FROM chats WHERE user_id = ?1");
    let mut values: Vec<Value> = vec![Value::Integer(user_id)];

    if let Some(chat_id) = filter.chat_id {
        values.push(Value::Integer(chat_id));
        sql.push_str(&format!(" AND id = ?{}", values.len()));
    }
    if let Some(date_from) = filter.date_from {
        values.push(Value::Text(date_from.to_rfc3339()));
        sql.push_str(&format!(" AND created_at >= ?{}", values.len()));
    }
    if let Some(date_to) = filter.date_to {
        values.push(Value::Text(date_to.to_rfc3339()));
        sql.push_str(&format!(" AND created_at <= ?{}", values.len()));
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let chats = stmt
        .query_map(rusqlite::params_from_iter(values), map_chat)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(chats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::storage::users::insert_user;

    #[test]
    fn test_chat_crud_and_ownership() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let bob = insert_user(conn, "bob", "b@example.com", "hash")?;

            let chat = insert_chat(conn, alice.id, None)?;
            assert!(chat.messages.is_empty());

            assert!(chat_owned(conn, alice.id, chat.id)?.is_some());
            assert!(chat_owned(conn, bob.id, chat.id)?.is_none());
            assert!(!delete_chat(conn, bob.id, chat.id)?);
            assert!(delete_chat(conn, alice.id, chat.id)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_append_messages() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let chat = insert_chat(conn, alice.id, None)?;

            let turns = vec![ChatMessage::user("hello"), ChatMessage::ai("Hi there!")];
            let updated = append_messages(conn, alice.id, chat.id, &turns)?;
            assert_eq!(updated.messages.len(), 2);

            let reloaded = chat_owned(conn, alice.id, chat.id)?.unwrap();
            assert_eq!(reloaded.messages.len(), 2);
            assert_eq!(reloaded.messages[0].role, "user");
            assert_eq!(reloaded.messages[1].content, "Hi there!");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_append_to_foreign_chat_fails() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let bob = insert_user(conn, "bob", "b@example.com", "hash")?;
            let chat = insert_chat(conn, alice.id, None)?;

            let result = append_messages(conn, bob.id, chat.id, &[ChatMessage::user("hi")]);
            assert!(result.is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_chats_filtered() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let first = insert_chat(conn, alice.id, None)?;
            let _second = insert_chat(conn, alice.id, None)?;

            let all = chats_filtered(conn, alice.id, &ChatFilter::default())?;
            assert_eq!(all.len(), 2);

            let only_first = chats_filtered(
                conn,
                alice.id,
                &ChatFilter {
                    chat_id: Some(first.id),
                    ..Default::default()
                },
            )?;
            assert_eq!(only_first.len(), 1);
            assert_eq!(only_first[0].id, first.id);

            let future = chats_filtered(
                conn,
                alice.id,
                &ChatFilter {
                    date_from: Some(Utc::now() + chrono::Duration::days(1)),
                    ..Default::default()
                },
            )?;
            assert!(future.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
