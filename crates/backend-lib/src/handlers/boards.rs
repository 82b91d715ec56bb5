// ============================
// crates/backend-lib/src/handlers/boards.rs
// ============================
//! Board CRUD, scoped to the authenticated owner.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use taskboard_common::{Board, BoardPayload, BoardSearch, Id, PageParams};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::handlers::{pagination_headers, PageQuery};
use crate::ownership;
use crate::storage::Storage;
use crate::validation;
use crate::AppState;

/// GET /api/boards
pub async fn list_boards<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = PageParams::from_query(query.page, query.limit);
    let result = state.storage.boards_for_user(user.id, page).await?;

    let mut response = Json(result.items).into_response();
    if let Some(page) = page {
        response
            .headers_mut()
            .extend(pagination_headers(result.total, page));
    }
    Ok(response)
}

/// GET /api/boards/search
pub async fn search_boards<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<BoardSearch>,
) -> Result<Json<Vec<Board>>, AppError> {
    let boards = state.storage.search_boards(user.id, &query).await?;
    Ok(Json(boards))
}

/// POST /api/boards — creation establishes ownership from the identity.
pub async fn create_board<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BoardPayload>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_board(&payload, true)?;
    let board = state
        .storage
        .create_board(user.id, payload.name.unwrap_or_default(), payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /api/boards/{id}
pub async fn get_board<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<Id>,
) -> Result<Json<Board>, AppError> {
    let board = ownership::require_board(&state.storage, user.id, board_id).await?;
    Ok(Json(board))
}

/// PUT /api/boards/{id}
pub async fn update_board<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<Id>,
    Json(payload): Json<BoardPayload>,
) -> Result<Json<Board>, AppError> {
    let board = ownership::require_board(&state.storage, user.id, board_id).await?;
    validation::validate_board(&payload, false)?;
    let updated = state
        .storage
        .update_board(board.id, &payload)
        .await?
        .ok_or(AppError::NotFound("Board not found"))?;
    Ok(Json(updated))
}

/// DELETE /api/boards/{id}
pub async fn delete_board<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<Id>,
) -> Result<StatusCode, AppError> {
    let board = ownership::require_board(&state.storage, user.id, board_id).await?;
    state.storage.delete_board(board.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
