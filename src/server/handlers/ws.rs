//! WebSocket chat endpoint.
//!
//! The client authenticates with a `token` query parameter (browser
//! WebSocket clients cannot set headers), then exchanges plain-text
//! messages. Each incoming message is classified and answered; both turns
//! are appended to the chat's message log before the reply is sent.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::server::AppState;
use crate::server::auth;
use crate::storage::chats;
use crate::storage::models::ChatMessage;

#[derive(Debug, Deserialize)]
pub struct WsAuth {
    #[serde(default)]
    pub token: Option<String>,
}

/// `GET /ws/chat/:chat_id`
pub async fn chat_socket(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Query(params): Query<WsAuth>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, chat_id, params.token))
}

/// Close the socket with a policy-violation code.
async fn reject(mut socket: WebSocket) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: close_code::POLICY,
            reason: "unauthorized".into(),
        })))
        .await;
}

async fn handle_socket(mut socket: WebSocket, state: AppState, chat_id: i64, token: Option<String>) {
    // Authenticate before anything else; unauthenticated sockets get a
    // policy close, same as a missing chat.
    let Some(token) = token else {
        return reject(socket).await;
    };
    let user = match state.db.with_conn(|conn| auth::user_for_token(conn, &token)) {
        Ok(Some(user)) => user,
        _ => return reject(socket).await,
    };
    let owns_chat = matches!(
        state.db.with_conn(|conn| chats::chat_owned(conn, user.id, chat_id)),
        Ok(Some(_))
    );
    if !owns_chat {
        return reject(socket).await;
    }

    tracing::debug!(user = %user.username, chat_id, "websocket chat opened");

    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            // Ignore pings, pongs, and binary frames
            Ok(_) => continue,
        };

        let reply = state.responder.respond(&text);
        let user_turn = ChatMessage::user(text);
        let ai_turn = ChatMessage::ai(reply);

        let persisted = state.db.with_conn(|conn| {
            chats::append_messages(conn, user.id, chat_id, &[user_turn, ai_turn.clone()])
        });
        if let Err(e) = persisted {
            tracing::error!(error = %e, chat_id, "failed to persist chat turns");
            break;
        }

        let payload = match serde_json::to_string(&ai_turn) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode reply");
                break;
            }
        };
        if socket.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }

    tracing::debug!(chat_id, "websocket chat closed");
}
