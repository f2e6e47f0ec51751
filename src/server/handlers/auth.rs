//! Registration and login.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::server::AppState;
use crate::server::auth::{self, hash_password};
use crate::server::error::{ApiError, ApiResult};
use crate::storage::users;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let ttl = state.config.token_ttl_minutes;
    let token = state.db.with_conn(|conn| {
        if users::user_by_username(conn, &req.username)?.is_some() {
            return Ok(Err(ApiError::bad_request("Username taken")));
        }
        if users::user_by_email(conn, &req.email)?.is_some() {
            return Ok(Err(ApiError::bad_request("Email taken")));
        }

        let hashed = hash_password(&req.password);
        let user = users::insert_user(conn, &req.username, &req.email, &hashed)?;
        tracing::info!(user = %user.username, "registered");
        Ok(Ok(auth::issue_token(conn, user.id, ttl)?))
    })??;

    Ok(Json(TokenResponse::bearer(token)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let ttl = state.config.token_ttl_minutes;
    let token = state.db.with_conn(|conn| {
        let Some(user) = auth::authenticate(conn, &req.username, &req.password)? else {
            return Ok(Err(ApiError::unauthorized("Invalid credentials")));
        };
        Ok(Ok(auth::issue_token(conn, user.id, ttl)?))
    })??;

    Ok(Json(TokenResponse::bearer(token)))
}
