//! User and session queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::Result;
use crate::storage::models::{User, parse_timestamp};

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
        is_active: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, is_active";

/// Insert a new user and return the stored row.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO users (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, password_hash, created_at.to_rfc3339()],
    )?;
    let id = conn.last_insert_rowid();
    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
        is_active: true,
    })
}

/// Look a user up by username.
pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Look a user up by email.
pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Look a user up by id.
pub fn user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Update a user's email.
pub fn update_email(conn: &Connection, user_id: i64, email: &str) -> Result<()> {
    conn.execute(
        "UPDATE users SET email = ?1 WHERE id = ?2",
        params![email, user_id],
    )?;
    Ok(())
}

/// Update a user's password hash.
pub fn update_password_hash(conn: &Connection, user_id: i64, password_hash: &str) -> Result<()> {
    conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, user_id],
    )?;
    Ok(())
}

/// Delete a user; sessions, projects, chats, images, and recorded searches
/// cascade.
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
    Ok(())
}

/// Store a session token hash with its expiry.
pub fn insert_session(
    conn: &Connection,
    user_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            token_hash,
            user_id,
            Utc::now().to_rfc3339(),
            expires_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Resolve an unexpired session token hash to its user.
pub fn user_for_session(conn: &Connection, token_hash: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT u.id, u.username, u.email, u.password_hash, u.created_at, u.is_active
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = ?1 AND s.expires_at > ?2",
            params![token_hash, Utc::now().to_rfc3339()],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Drop expired sessions.
pub fn prune_sessions(conn: &Connection) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![Utc::now().to_rfc3339()],
    )?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::Duration;

    #[test]
    fn test_user_crud() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let user = insert_user(conn, "alice", "alice@example.com", "hash")?;
            assert_eq!(user.username, "alice");
            assert!(user.is_active);

            assert!(user_by_username(conn, "alice")?.is_some());
            assert!(user_by_username(conn, "bob")?.is_none());
            assert!(user_by_email(conn, "alice@example.com")?.is_some());

            update_email(conn, user.id, "new@example.com")?;
            assert_eq!(
                user_by_id(conn, user.id)?.unwrap().email,
                "new@example.com"
            );

            delete_user(conn, user.id)?;
            assert!(user_by_id(conn, user.id)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            insert_user(conn, "alice", "a@example.com", "hash")?;
            assert!(insert_user(conn, "alice", "b@example.com", "hash").is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_sessions() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let user = insert_user(conn, "alice", "a@example.com", "hash")?;

            insert_session(conn, user.id, "live", Utc::now() + Duration::minutes(30))?;
            insert_session(conn, user.id, "expired", Utc::now() - Duration::minutes(1))?;

            assert_eq!(user_for_session(conn, "live")?.unwrap().id, user.id);
            assert!(user_for_session(conn, "expired")?.is_none());
            assert!(user_for_session(conn, "unknown")?.is_none());

            assert_eq!(prune_sessions(conn)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_deleting_user_cascades_sessions() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let user = insert_user(conn, "alice", "a@example.com", "hash")?;
            insert_session(conn, user.id, "tok", Utc::now() + Duration::minutes(30))?;

            delete_user(conn, user.id)?;
            assert!(user_for_session(conn, "tok")?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
