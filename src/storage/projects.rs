//! Project queries. Every operation filters by the owning user.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::Result;
use crate::storage::models::{Project, parse_timestamp};

fn map_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        user_id: row.get(3)?,
        created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
    })
}

const PROJECT_COLUMNS: &str = "id, name, description, user_id, created_at";

/// Insert a project for a user.
pub fn insert_project(
    conn: &Connection,
    user_id: i64,
    name: &str,
    description: &str,
) -> Result<Project> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO projects (name, description, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, description, user_id, created_at.to_rfc3339()],
    )?;
    Ok(Project {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        description: description.to_string(),
        user_id,
        created_at,
    })
}

/// List all projects owned by a user.
pub fn projects_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = ?1 ORDER BY id"
    ))?;
    let projects = stmt
        .query_map(params![user_id], map_project)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(projects)
}

/// Fetch a project only if it belongs to the user.
pub fn project_owned(conn: &Connection, user_id: i64, project_id: i64) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1 AND user_id = ?2"),
            params![project_id, user_id],
            map_project,
        )
        .optional()?;
    Ok(project)
}

/// Update name and/or description of an owned project. Returns the updated
/// row, or `None` if the project does not belong to the user.
pub fn update_project(
    conn: &Connection,
    user_id: i64,
    project_id: i64,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Project>> {
    if let Some(name) = name {
        conn.execute(
            "UPDATE projects SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            params![name, project_id, user_id],
        )?;
    }
    if let Some(description) = description {
        conn.execute(
            "UPDATE projects SET description = ?1 WHERE id = ?2 AND user_id = ?3",
            params![description, project_id, user_id],
        )?;
    }
    project_owned(conn, user_id, project_id)
}

/// Delete an owned project. Returns whether a row was removed.
pub fn delete_project(conn: &Connection, user_id: i64, project_id: i64) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM projects WHERE id = ?1 AND user_id = ?2",
        params![project_id, user_id],
    )?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::storage::users::insert_user;

    #[test]
    fn test_project_crud_and_ownership() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = insert_user(conn, "alice", "a@example.com", "hash")?;
            let bob = insert_user(conn, "bob", "b@example.com", "hash")?;

            let project = insert_project(conn, alice.id, "Demo", "A demo project")?;
            assert_eq!(projects_for_user(conn, alice.id)?.len(), 1);
            assert!(projects_for_user(conn, bob.id)?.is_empty());

            // Ownership: bob cannot see, update, or delete alice's project
            assert!(project_owned(conn, bob.id, project.id)?.is_none());
            assert!(update_project(conn, bob.id, project.id, Some("x"), None)?.is_none());
            assert!(!delete_project(conn, bob.id, project.id)?);

            let updated = update_project(
                conn,
                alice.id,
                project.id,
                Some("Renamed"),
                Some("New description"),
            )?
            .unwrap();
            assert_eq!(updated.name, "Renamed");
            assert_eq!(updated.description, "New description");

            assert!(delete_project(conn, alice.id, project.id)?);
            assert!(project_owned(conn, alice.id, project.id)?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
