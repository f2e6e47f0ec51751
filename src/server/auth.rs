//! Bearer-token authentication.
//!
//! Passwords are stored as `salt$digest` where the digest is
//! SHA-256(salt || password). Session tokens are opaque UUIDs handed to the
//! client; only their SHA-256 hash is persisted, with a TTL. The
//! [`AuthUser`] extractor resolves `Authorization: Bearer <token>` to the
//! owning user.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::storage::models::User;
use crate::storage::users;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::rng().fill_bytes(&mut salt);

    let digest = password_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Verify a password against a stored `salt$digest` hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    hex::encode(password_digest(&salt, password)) == digest_hex
}

fn password_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Hash a session token for at-rest storage.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issue a new session token for a user.
pub fn issue_token(
    conn: &rusqlite::Connection,
    user_id: i64,
    ttl_minutes: i64,
) -> Result<String> {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + Duration::minutes(ttl_minutes);
    users::insert_session(conn, user_id, &hash_token(&token), expires_at)?;
    Ok(token)
}

/// Resolve a presented token to its user, if the session is still live.
pub fn user_for_token(conn: &rusqlite::Connection, token: &str) -> Result<Option<User>> {
    users::user_for_session(conn, &hash_token(token))
}

/// Check a username/password pair against the stored credentials.
pub fn authenticate(
    conn: &rusqlite::Connection,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    match users::user_by_username(conn, username)? {
        Some(user) if verify_password(password, &user.password_hash) => Ok(Some(user)),
        _ => Ok(None),
    }
}

/// Extractor for the authenticated user behind a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        let user = state
            .db
            .with_conn(|conn| user_for_token(conn, token))?
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        Ok(AuthUser(user))
    }
}
