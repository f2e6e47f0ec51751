//! Image metadata queries. The image bytes live on disk; rows only track
//! filename, path, and ownership.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::Result;
use crate::storage::models::{StoredImage, parse_timestamp};

fn map_image(row: &Row) -> rusqlite::Result<StoredImage> {
    Ok(StoredImage {
        id: row.get(0)?,
        filename: row.get(1)?,
        path: row.get(2)?,
        user_id: row.get(3)?,
        project_id: row.get(4)?,
        uploaded_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
    })
}

const IMAGE_COLUMNS: &str = "id, filename, path, user_id, project_id, uploaded_at";

/// Record an image owned by a user.
pub fn insert_image(
    conn: &Connection,
    user_id: i64,
    project_id: Option<i64>,
    filename: &str,
    path: &str,
) -> Result<StoredImage> {
    let uploaded_at = Utc::now();
    conn.execute(
        "INSERT INTO images (filename, path, user_id, project_id, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![filename, path, user_id, project_id, uploaded_at.to_rfc3339()],
    )?;
    Ok(StoredImage {
        id: conn.last_insert_rowid(),
        filename: filename.to_string(),
        path: path.to_string(),
        user_id,
        project_id,
        uploaded_at,
    })
}

/// List all images owned by a user.
pub fn images_for_user(conn: &Connection, user_id: i64) -> Result<Vec<StoredImage>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = ?1 ORDER BY id"
    ))?;
    let images = stmt
        .query_map(params![user_id], map_image)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(images)
}

/// Fetch an image only if it belongs to the user.
pub fn image_owned(conn: &Connection, user_id: i64, image_id: i64) -> Result<Option<StoredImage>> {
    let image = conn
        .query_row(
            &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = ?1 AND user_id = ?2"),
            params![image_id, user_id],
            map_image,
        )
        .optional()?;
    Ok(image)
}

/// Delete an owned image row. Returns whether a row was removed.
pub fn delete_image(conn: &Connection, user_id: i64, image_id: i64) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM images WHERE id = ?1 AND user_id = ?2",
        params![image_id, user_id],
    )?;
    Ok(removed > 0)
}
