//! Account and settings endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::auth::{AuthUser, hash_password};
use crate::server::error::ApiResult;
use crate::storage::users;

#[derive(Debug, Deserialize)]
pub struct AccountUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Per-user display settings. Not persisted; the defaults are returned and
/// echoed back, matching the behavior the frontend expects.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            notifications: default_notifications(),
        }
    }
}

/// `GET /account`
pub async fn get_account(AuthUser(user): AuthUser) -> ApiResult<Json<Value>> {
    Ok(Json(json!({
        "username": user.username,
        "email": user.email,
    })))
}

/// `PUT /account`
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AccountUpdate>,
) -> ApiResult<Json<Value>> {
    state.db.with_conn(|conn| {
        if let Some(email) = &req.email {
            users::update_email(conn, user.id, email)?;
        }
        if let Some(password) = &req.password {
            users::update_password_hash(conn, user.id, &hash_password(password))?;
        }
        Ok(())
    })?;
    Ok(Json(json!({ "message": "Updated" })))
}

/// `DELETE /account`
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Value>> {
    state.db.with_conn(|conn| users::delete_user(conn, user.id))?;
    tracing::info!(user = %user.username, "account deleted");
    Ok(Json(json!({ "message": "Account deleted" })))
}

/// `GET /settings`
pub async fn get_settings(AuthUser(_user): AuthUser) -> ApiResult<Json<Settings>> {
    Ok(Json(Settings::default()))
}

/// `PUT /settings`
pub async fn update_settings(
    AuthUser(_user): AuthUser,
    Json(settings): Json<Settings>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(settings))
}
