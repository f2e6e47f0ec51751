//! Project CRUD.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::{ApiError, ApiResult};
use crate::storage::models::Project;
use crate::storage::projects;

#[derive(Debug, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET /projects`
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Project>>> {
    let list = state
        .db
        .with_conn(|conn| projects::projects_for_user(conn, user.id))?;
    Ok(Json(list))
}

/// `POST /projects`
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ProjectCreate>,
) -> ApiResult<Json<Project>> {
    let project = state
        .db
        .with_conn(|conn| projects::insert_project(conn, user.id, &req.name, &req.description))?;
    Ok(Json(project))
}

/// `GET /projects/:project_id`
pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Project>> {
    let project = state
        .db
        .with_conn(|conn| projects::project_owned(conn, user.id, project_id))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// `PUT /projects/:project_id`
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(req): Json<ProjectUpdate>,
) -> ApiResult<Json<Project>> {
    let project = state
        .db
        .with_conn(|conn| {
            projects::update_project(
                conn,
                user.id,
                project_id,
                req.name.as_deref(),
                req.description.as_deref(),
            )
        })?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// `DELETE /projects/:project_id`
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let removed = state
        .db
        .with_conn(|conn| projects::delete_project(conn, user.id, project_id))?;
    if !removed {
        return Err(ApiError::not_found("Project not found"));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}
