//! Image upload, generation, and metadata CRUD.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::{ApiError, ApiResult};
use crate::storage::images;
use crate::storage::models::StoredImage;

/// Smallest valid PNG (1x1 pixel), served when no image backend is
/// configured.
const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
    0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x09, 0x70, 0x48, 0x59, 0x73, 0x00, 0x00, 0x0B, 0x13,
    0x00, 0x00, 0x0B, 0x13, 0x01, 0x00, 0x9A, 0x9C, 0x18, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44,
    0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD,
    0x8D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub project_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerate {
    pub prompt: String,
    #[serde(default)]
    pub project_id: Option<i64>,
}

/// `GET /images`
pub async fn list_images(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<StoredImage>>> {
    let list = state
        .db
        .with_conn(|conn| images::images_for_user(conn, user.id))?;
    Ok(Json(list))
}

/// `POST /images/upload`
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> ApiResult<Json<StoredImage>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::bad_request("Invalid filename"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Upload failed: {e}")))?;

        let path = state.config.uploads_dir.join(&filename);
        tokio::fs::create_dir_all(&state.config.uploads_dir)
            .await
            .map_err(|e| ApiError::internal(format!("Cannot create uploads dir: {e}")))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::internal(format!("Cannot store upload: {e}")))?;

        let image = state.db.with_conn(|conn| {
            images::insert_image(
                conn,
                user.id,
                params.project_id,
                &filename,
                &path.to_string_lossy(),
            )
        })?;
        tracing::info!(user = %user.username, filename = %image.filename, "image uploaded");
        return Ok(Json(image));
    }

    Err(ApiError::bad_request("No file field in upload"))
}

/// `GET /images/:image_id`
pub async fn get_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(image_id): Path<i64>,
) -> ApiResult<Json<StoredImage>> {
    let image = state
        .db
        .with_conn(|conn| images::image_owned(conn, user.id, image_id))?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;
    Ok(Json(image))
}

/// `DELETE /images/:image_id`
pub async fn delete_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(image_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let image = state
        .db
        .with_conn(|conn| images::image_owned(conn, user.id, image_id))?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    // Remove the file first; a missing file is not an error worth failing
    // the delete over.
    if let Err(e) = tokio::fs::remove_file(&image.path).await {
        tracing::warn!(path = %image.path, error = %e, "could not remove image file");
    }
    state
        .db
        .with_conn(|conn| images::delete_image(conn, user.id, image_id))?;

    Ok(Json(json!({ "message": "Deleted" })))
}

/// `POST /images/generate`
///
/// With `OPENAI_API_KEY` set, generation goes through the OpenAI image API;
/// otherwise a placeholder PNG is produced so the endpoint works in
/// development.
pub async fn generate_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ImageGenerate>,
) -> ApiResult<Json<StoredImage>> {
    let timestamp = chrono::Utc::now().timestamp();

    let (filename, bytes) = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => {
            let bytes = fetch_generated_image(&api_key, &req.prompt)
                .await
                .map_err(|e| ApiError::internal(format!("Image generation failed: {e}")))?;
            (format!("generated_{}_{timestamp}.png", user.id), bytes)
        }
        _ => (
            format!("mock_generated_{}_{timestamp}.png", user.id),
            MOCK_PNG.to_vec(),
        ),
    };

    tokio::fs::create_dir_all(&state.config.uploads_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot create uploads dir: {e}")))?;
    let path = state.config.uploads_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot store image: {e}")))?;

    let image = state.db.with_conn(|conn| {
        images::insert_image(
            conn,
            user.id,
            req.project_id,
            &filename,
            &path.to_string_lossy(),
        )
    })?;
    Ok(Json(image))
}

/// Call the OpenAI image API and download the resulting image.
async fn fetch_generated_image(api_key: &str, prompt: &str) -> anyhow::Result<Vec<u8>> {
    let client = reqwest::Client::new();

    let response: Value = client
        .post("https://api.openai.com/v1/images/generations")
        .bearer_auth(api_key)
        .json(&json!({
            "model": "dall-e-3",
            "prompt": prompt,
            "size": "1024x1024",
            "quality": "standard",
            "n": 1,
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let url = response["data"][0]["url"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no image url in response"))?;

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// Keep only the final path component and drop anything that could escape
/// the uploads directory.
fn sanitize_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !matches!(c, '\0' | ':'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
