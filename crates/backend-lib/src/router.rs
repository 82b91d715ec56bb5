// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router assembly.
//!
//! Two route groups: the public auth endpoints, and the resource routes
//! behind the multi-scheme authentication middleware.
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::handlers::{auth as auth_handlers, boards, cards, lists};
use crate::storage::Storage;
use crate::AppState;

/// Create the API router
pub fn create_router<S: Storage + Send + Sync + 'static>(state: Arc<AppState<S>>) -> Router {
    let public = Router::new()
        .route("/api/register", post(auth_handlers::register::<S>))
        .route("/api/login", post(auth_handlers::login::<S>))
        .route("/api/token", post(auth_handlers::token::<S>))
        .route("/api/logout", post(auth_handlers::logout::<S>));

    let protected = Router::new()
        .route("/api/user", get(auth_handlers::current_user))
        .route(
            "/api/boards",
            get(boards::list_boards::<S>).post(boards::create_board::<S>),
        )
        .route("/api/boards/search", get(boards::search_boards::<S>))
        .route(
            "/api/boards/{id}",
            get(boards::get_board::<S>)
                .put(boards::update_board::<S>)
                .delete(boards::delete_board::<S>),
        )
        .route(
            "/api/boards/{board_id}/lists",
            get(lists::list_lists::<S>).post(lists::create_list::<S>),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}",
            put(lists::update_list::<S>).delete(lists::delete_list::<S>),
        )
        .route(
            "/api/lists/{list_id}/cards",
            get(cards::list_cards::<S>).post(cards::create_card::<S>),
        )
        .route(
            "/api/lists/{list_id}/cards/{card_id}",
            patch(cards::patch_card::<S>).delete(cards::delete_card::<S>),
        )
        .route("/api/cards/search", get(cards::search_cards::<S>))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate::<S>));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
