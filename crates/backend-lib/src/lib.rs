// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the taskboard API server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ownership;
pub mod router;
pub mod seed;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{SessionManager, TokenCodec};
use crate::config::Settings;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Storage backend
    pub storage: S,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Bearer token codec
    pub tokens: TokenCodec,
    /// Settings
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Self {
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(
            settings.session_ttl_secs,
        )));
        let tokens = TokenCodec::new(
            &settings.jwt_secret,
            Duration::from_secs(settings.token_ttl_secs),
        );
        Self {
            storage,
            sessions,
            tokens,
            settings: Arc::new(settings),
        }
    }
}
