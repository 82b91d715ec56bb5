// ============================
// crates/backend-lib/src/ownership.rs
// ============================
//! Ownership-scoped resource gateway.
//!
//! Every board, list and card operation resolves the entity chain with
//! explicit sequential lookups before touching the store. The check order
//! is fixed: existence (404), then ownership (403), then cross-reference
//! consistency (400). A nonexistent resource is 404 for everyone,
//! including requesters who could never own it.
use taskboard_common::{Board, Card, Id, List};

use crate::error::AppError;
use crate::storage::Storage;

/// Resolve a board and require the requester to own it.
pub async fn require_board<S: Storage>(
    storage: &S,
    user_id: Id,
    board_id: Id,
) -> Result<Board, AppError> {
    let board = storage
        .get_board(board_id)
        .await?
        .ok_or(AppError::NotFound("Board not found"))?;
    if board.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(board)
}

/// Resolve a list addressed as a child of `board_id`, requiring board
/// ownership and that the list actually belongs to that board.
pub async fn require_list_in_board<S: Storage>(
    storage: &S,
    user_id: Id,
    board_id: Id,
    list_id: Id,
) -> Result<List, AppError> {
    let board = require_board(storage, user_id, board_id).await?;
    let list = storage
        .get_list(list_id)
        .await?
        .ok_or(AppError::NotFound("List not found"))?;
    if list.board_id != board.id {
        return Err(AppError::BadRequest(
            "List does not belong to this board".to_string(),
        ));
    }
    Ok(list)
}

/// Resolve a list and walk up to its board, requiring ownership of the
/// chain. Any missing link is NotFound.
pub async fn require_list_chain<S: Storage>(
    storage: &S,
    user_id: Id,
    list_id: Id,
) -> Result<List, AppError> {
    let list = storage
        .get_list(list_id)
        .await?
        .ok_or(AppError::NotFound("List not found"))?;
    let board = storage
        .get_board(list.board_id)
        .await?
        .ok_or(AppError::NotFound("Board not found"))?;
    if board.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(list)
}

/// Resolve a card addressed as a child of `list_id`, walking the full
/// card -> list -> board -> user chain. When `include_deleted` is set the
/// lookup sees tombstoned records; the delete path needs this so that
/// repeated deletes stay idempotent.
pub async fn require_card_in_list<S: Storage>(
    storage: &S,
    user_id: Id,
    list_id: Id,
    card_id: Id,
    include_deleted: bool,
) -> Result<Card, AppError> {
    let list = require_list_chain(storage, user_id, list_id).await?;
    let card = if include_deleted {
        storage.get_card_record(card_id).await?
    } else {
        storage.get_card(card_id).await?
    }
    .ok_or(AppError::NotFound("Card not found"))?;
    if card.list_id != list.id {
        return Err(AppError::BadRequest(
            "Card does not belong to this list".to_string(),
        ));
    }
    Ok(card)
}
