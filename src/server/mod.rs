//! HTTP/WebSocket serving layer.
//!
//! The responder, database handle, and configuration are built once at
//! startup and shared read-only through [`AppState`]; request handlers never
//! mutate them. Protocol machinery is delegated to axum and tower-http.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::error::{KaisangError, Result};
use crate::responder::Responder;
use crate::storage::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub responder: Arc<Responder>,
    pub config: Arc<ServerConfig>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Chats
        .route(
            "/chats",
            get(handlers::chats::list_chats).post(handlers::chats::create_chat),
        )
        .route(
            "/chats/:chat_id",
            get(handlers::chats::get_chat).delete(handlers::chats::delete_chat),
        )
        .route("/ws/chat/:chat_id", get(handlers::ws::chat_socket))
        // Projects
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:project_id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        // Images
        .route("/images", get(handlers::images::list_images))
        .route("/images/upload", post(handlers::images::upload_image))
        .route("/images/generate", post(handlers::images::generate_image))
        .route(
            "/images/:image_id",
            get(handlers::images::get_image).delete(handlers::images::delete_image),
        )
        // Search
        .route("/search", post(handlers::search::perform_search))
        .route("/search/history", get(handlers::search::search_history))
        // Settings and account
        .route(
            "/settings",
            get(handlers::account::get_settings).put(handlers::account::update_settings),
        )
        .route(
            "/account",
            get(handlers::account::get_account)
                .put(handlers::account::update_account)
                .delete(handlers::account::delete_account),
        )
        // Unauthenticated classify-and-respond endpoint
        .route("/predict", post(handlers::predict::predict))
        .nest_service("/uploads", ServeDir::new(&state.config.uploads_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Load all shared state and serve until the process is stopped.
pub async fn run(config: ServerConfig) -> Result<()> {
    std::fs::create_dir_all(&config.uploads_dir)?;

    let responder = Responder::load(&config.models_dir, &config.intents_path)?;
    tracing::info!(
        classes = responder.artifacts().metadata.classes.len(),
        vocabulary = responder.artifacts().metadata.vocabulary_size,
        "loaded trained artifacts"
    );

    let db = Database::open(&config.database_path)?;
    let pruned = db.with_conn(crate::storage::users::prune_sessions)?;
    if pruned > 0 {
        tracing::debug!(pruned, "removed expired sessions");
    }

    let state = AppState {
        db: Arc::new(db),
        responder: Arc::new(responder),
        config: Arc::new(config),
    };

    let listener = TcpListener::bind(&state.config.bind_addr)
        .await
        .map_err(|e| {
            KaisangError::other(format!("cannot bind {}: {e}", state.config.bind_addr))
        })?;
    tracing::info!(addr = %state.config.bind_addr, "listening");

    let app = router(state);
    axum::serve(listener, app)
        .await
        .map_err(|e| KaisangError::other(format!("server error: {e}")))?;

    Ok(())
}
