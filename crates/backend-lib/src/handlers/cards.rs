// ============================
// crates/backend-lib/src/handlers/cards.rs
// ============================
//! Card CRUD with soft-delete semantics, nested under the owning list.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use taskboard_common::{Card, CardPayload, CardSearch, Id, PageParams};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::handlers::{pagination_headers, CardsQuery};
use crate::ownership;
use crate::storage::{CardListQuery, Storage};
use crate::validation;
use crate::AppState;

/// GET /api/lists/{list_id}/cards
pub async fn list_cards<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<Id>,
    Query(query): Query<CardsQuery>,
) -> Result<Response, AppError> {
    let list = ownership::require_list_chain(&state.storage, user.id, list_id).await?;

    let page = PageParams::from_query(query.page, query.limit);
    let result = state
        .storage
        .cards_for_list(
            list.id,
            &CardListQuery {
                page,
                sort: query.sort,
                order: query.order,
            },
        )
        .await?;

    let mut response = Json(result.items).into_response();
    if let Some(page) = page {
        response
            .headers_mut()
            .extend(pagination_headers(result.total, page));
    }
    Ok(response)
}

/// GET /api/cards/search
pub async fn search_cards<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CardSearch>,
) -> Result<Json<Vec<Card>>, AppError> {
    let cards = state.storage.search_cards(user.id, &query).await?;
    Ok(Json(cards))
}

/// POST /api/lists/{list_id}/cards
pub async fn create_card<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<Id>,
    Json(payload): Json<CardPayload>,
) -> Result<impl IntoResponse, AppError> {
    let list = ownership::require_list_chain(&state.storage, user.id, list_id).await?;
    validation::validate_card(&payload, true)?;
    let card = state.storage.create_card(list.id, payload).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PATCH /api/lists/{list_id}/cards/{card_id}
pub async fn patch_card<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path((list_id, card_id)): Path<(Id, Id)>,
    Json(payload): Json<CardPayload>,
) -> Result<Json<Card>, AppError> {
    let card =
        ownership::require_card_in_list(&state.storage, user.id, list_id, card_id, false).await?;
    validation::validate_card(&payload, false)?;
    let updated = state
        .storage
        .update_card(card.id, &payload)
        .await?
        .ok_or(AppError::NotFound("Card not found"))?;
    Ok(Json(updated))
}

/// DELETE /api/lists/{list_id}/cards/{card_id} — tombstones the card.
/// Resolution includes already-tombstoned records so a repeated delete
/// stays idempotent.
pub async fn delete_card<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Path((list_id, card_id)): Path<(Id, Id)>,
) -> Result<StatusCode, AppError> {
    let card =
        ownership::require_card_in_list(&state.storage, user.id, list_id, card_id, true).await?;
    state.storage.delete_card(card.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
