//! Integration tests for the storage layer: ownership isolation and the
//! chat history search flow.

use chrono::{Duration, Utc};

use kaisang::storage::chats::{self, ChatFilter};
use kaisang::storage::models::ChatMessage;
use kaisang::storage::users::insert_user;
use kaisang::storage::{Database, images, projects, searches};

#[test]
fn users_only_see_their_own_data() {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(|conn| {
        let alice = insert_user(conn, "alice", "alice@example.com", "hash")?;
        let bob = insert_user(conn, "bob", "bob@example.com", "hash")?;

        let project = projects::insert_project(conn, alice.id, "Research", "notes")?;
        let chat = chats::insert_chat(conn, alice.id, Some(project.id))?;
        let image = images::insert_image(conn, alice.id, None, "a.png", "uploads/a.png")?;

        // Bob sees nothing of Alice's
        assert!(projects::projects_for_user(conn, bob.id)?.is_empty());
        assert!(chats::chats_for_user(conn, bob.id)?.is_empty());
        assert!(images::images_for_user(conn, bob.id)?.is_empty());
        assert!(chats::chat_owned(conn, bob.id, chat.id)?.is_none());
        assert!(images::image_owned(conn, bob.id, image.id)?.is_none());

        // And cannot delete them
        assert!(!chats::delete_chat(conn, bob.id, chat.id)?);
        assert!(!projects::delete_project(conn, bob.id, project.id)?);
        Ok(())
    })
    .unwrap();
}

#[test]
fn account_deletion_cascades() {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(|conn| {
        let alice = insert_user(conn, "alice", "alice@example.com", "hash")?;
        let project = projects::insert_project(conn, alice.id, "P", "")?;
        let chat = chats::insert_chat(conn, alice.id, Some(project.id))?;
        images::insert_image(conn, alice.id, Some(project.id), "a.png", "uploads/a.png")?;
        searches::insert_search(conn, alice.id, "q", &serde_json::json!({"results": []}))?;

        kaisang::storage::users::delete_user(conn, alice.id)?;

        let leftover_chats: i64 =
            conn.query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))?;
        let leftover_projects: i64 =
            conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        let leftover_images: i64 =
            conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        let leftover_searches: i64 =
            conn.query_row("SELECT COUNT(*) FROM search_queries", [], |row| row.get(0))?;

        assert_eq!(leftover_chats, 0);
        assert_eq!(leftover_projects, 0);
        assert_eq!(leftover_images, 0);
        assert_eq!(leftover_searches, 0);
        assert!(chats::chat_owned(conn, alice.id, chat.id)?.is_none());
        Ok(())
    })
    .unwrap();
}

#[test]
fn chat_history_search_flow() {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(|conn| {
        let alice = insert_user(conn, "alice", "alice@example.com", "hash")?;

        let rust_chat = chats::insert_chat(conn, alice.id, None)?;
        chats::append_messages(
            conn,
            alice.id,
            rust_chat.id,
            &[
                ChatMessage::user("tell me about Rust"),
                ChatMessage::ai("Rust is a systems language."),
            ],
        )?;

        let cooking_chat = chats::insert_chat(conn, alice.id, None)?;
        chats::append_messages(
            conn,
            alice.id,
            cooking_chat.id,
            &[ChatMessage::user("how do I cook pasta")],
        )?;

        // Keyword filtering happens above storage; the layer narrows by
        // ownership and structural filters.
        let all = chats::chats_filtered(conn, alice.id, &ChatFilter::default())?;
        let with_rust: Vec<_> = all
            .iter()
            .filter(|chat| {
                chat.messages
                    .iter()
                    .any(|m| m.content.to_lowercase().contains("rust"))
            })
            .collect();
        assert_eq!(with_rust.len(), 1);
        assert_eq!(with_rust[0].id, rust_chat.id);

        // Date filters
        let none = chats::chats_filtered(
            conn,
            alice.id,
            &ChatFilter {
                date_to: Some(Utc::now() - Duration::days(1)),
                ..Default::default()
            },
        )?;
        assert!(none.is_empty());

        // Recording the search makes it show up in history, newest first
        searches::insert_search(conn, alice.id, "rust", &serde_json::json!({"results": [1]}))?;
        searches::insert_search(conn, alice.id, "pasta", &serde_json::json!({"results": []}))?;
        let history = searches::searches_for_user(conn, alice.id)?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "pasta");
        Ok(())
    })
    .unwrap();
}

#[test]
fn message_log_preserves_order_across_appends() {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(|conn| {
        let alice = insert_user(conn, "alice", "alice@example.com", "hash")?;
        let chat = chats::insert_chat(conn, alice.id, None)?;

        for i in 0..5 {
            chats::append_messages(
                conn,
                alice.id,
                chat.id,
                &[
                    ChatMessage::user(format!("question {i}")),
                    ChatMessage::ai(format!("answer {i}")),
                ],
            )?;
        }

        let reloaded = chats::chat_owned(conn, alice.id, chat.id)?.unwrap();
        assert_eq!(reloaded.messages.len(), 10);
        assert_eq!(reloaded.messages[0].content, "question 0");
        assert_eq!(reloaded.messages[9].content, "answer 4");
        assert!(
            reloaded
                .messages
                .iter()
                .step_by(2)
                .all(|m| m.role == "user")
        );
        Ok(())
    })
    .unwrap();
}
