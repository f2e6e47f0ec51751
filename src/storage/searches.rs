//! Recorded search queries.

use chrono::Utc;
use rusqlite::{Connection, Row, params};

use crate::error::Result;
use crate::storage::models::{SearchRecord, parse_json, parse_timestamp};

fn map_search(row: &Row) -> rusqlite::Result<SearchRecord> {
    Ok(SearchRecord {
        id: row.get(0)?,
        query: row.get(1)?,
        user_id: row.get(2)?,
        results: parse_json(3, &row.get::<_, String>(3)?)?,
        timestamp: parse_timestamp(4, &row.get::<_, String>(4)?)?,
    })
}

/// Record a search and its result snapshot.
pub fn insert_search(
    conn: &Connection,
    user_id: i64,
    query: &str,
    results: &serde_json::Value,
) -> Result<SearchRecord> {
    let timestamp = Utc::now();
    conn.execute(
        "INSERT INTO search_queries (query, user_id, results, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![
            query,
            user_id,
            serde_json::to_string(results)?,
            timestamp.to_rfc3339()
        ],
    )?;
    Ok(SearchRecord {
        id: conn.last_insert_rowid(),
        query: query.to_string(),
        user_id,
        results: results.clone(),
        timestamp,
    })
}

/// List a user's recorded searches, newest first.
pub fn searches_for_user(conn: &Connection, user_id: i64) -> Result<Vec<SearchRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, query, user_id, results, timestamp
         FROM search_queries WHERE user_id = ?1 ORDER BY id DESC",
    )?;
    let records = stmt
        .query_map(params![user_id], map_search)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::storage::users::insert_user;
    use serde_json::json;

    #[test]
    fn test_search_history() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let bob = insert_user(conn, "bob", "b@example.com", "hash")?;

            insert_search(conn, alice.id, "rust", &json!({"results": []}))?;
            insert_search(conn, alice.id, "sqlite", &json!({"results": [1]}))?;

            let history = searches_for_user(conn, alice.id)?;
            assert_eq!(history.len(), 2);
            // Newest first
            assert_eq!(history[0].query, "sqlite");
            assert!(searches_for_user(conn, bob.id)?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
