//! # Kaisang
//!
//! An intent-classification chat backend for Rust.
//!
//! ## Features
//!
//! - TF-IDF text vectorization with a pluggable analysis pipeline
//! - Multinomial logistic regression intent classifier
//! - Canned-response selection with emoji stripping
//! - SQLite-backed accounts, projects, chats, images, and search history
//! - HTTP/WebSocket serving layer with bearer-token auth

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod intent;
pub mod responder;
pub mod server;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
