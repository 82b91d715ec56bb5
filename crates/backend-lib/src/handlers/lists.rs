// ============================
// crates/backend-lib/src/handlers/lists.rs
// ============================
//! List CRUD, nested under the owning board.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use taskboard_common::{Id, List, ListPayload, PageParams};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::handlers::{pagination_headers, PageQuery};
use crate::ownership;
use crate::storage::Storage;
use crate::validation;
use crate::AppState;

/// GET /api/boards/{board_id}/lists
pub async fn list_lists<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<Id>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let board = ownership::require_board(&state.storage, user.id, board_id).await?;

    let page = PageParams::from_query(query.page, query.limit);
    let result = state.storage.lists_for_board(board.id, page).await?;

    let mut response = Json(result.items).into_response();
    if let Some(page) = page {
        response
            .headers_mut()
            .extend(pagination_headers(result.total, page));
    }
    Ok(response)
}

/// POST /api/boards/{board_id}/lists
pub async fn create_list<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<Id>,
    Json(payload): Json<ListPayload>,
) -> Result<impl IntoResponse, AppError> {
    let board = ownership::require_board(&state.storage, user.id, board_id).await?;
    validation::validate_list(&payload, true)?;
    let list = state
        .storage
        .create_list(board.id, payload.title.unwrap_or_default())
        .await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// PUT /api/boards/{board_id}/lists/{list_id}
pub async fn update_list<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path((board_id, list_id)): Path<(Id, Id)>,
    Json(payload): Json<ListPayload>,
) -> Result<Json<List>, AppError> {
    let list =
        ownership::require_list_in_board(&state.storage, user.id, board_id, list_id).await?;
    validation::validate_list(&payload, false)?;
    let updated = state
        .storage
        .update_list(list.id, &payload)
        .await?
        .ok_or(AppError::NotFound("List not found"))?;
    Ok(Json(updated))
}

/// DELETE /api/boards/{board_id}/lists/{list_id}
pub async fn delete_list<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path((board_id, list_id)): Path<(Id, Id)>,
) -> Result<StatusCode, AppError> {
    let list =
        ownership::require_list_in_board(&state.storage, user.id, board_id, list_id).await?;
    state.storage.delete_list(list.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
