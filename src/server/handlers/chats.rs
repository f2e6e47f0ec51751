//! Chat CRUD.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::{ApiError, ApiResult};
use crate::storage::chats;
use crate::storage::models::Chat;

#[derive(Debug, Deserialize)]
pub struct ChatCreate {
    #[serde(default)]
    pub project_id: Option<i64>,
}

/// `GET /chats`
pub async fn list_chats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Chat>>> {
    let list = state
        .db
        .with_conn(|conn| chats::chats_for_user(conn, user.id))?;
    Ok(Json(list))
}

/// `POST /chats`
pub async fn create_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ChatCreate>,
) -> ApiResult<Json<Chat>> {
    let chat = state
        .db
        .with_conn(|conn| chats::insert_chat(conn, user.id, req.project_id))?;
    Ok(Json(chat))
}

/// `GET /chats/:chat_id`
pub async fn get_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<i64>,
) -> ApiResult<Json<Chat>> {
    let chat = state
        .db
        .with_conn(|conn| chats::chat_owned(conn, user.id, chat_id))?
        .ok_or_else(|| ApiError::not_found("Chat not found"))?;
    Ok(Json(chat))
}

/// `DELETE /chats/:chat_id`
pub async fn delete_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let removed = state
        .db
        .with_conn(|conn| chats::delete_chat(conn, user.id, chat_id))?;
    if !removed {
        return Err(ApiError::not_found("Chat not found"));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}
