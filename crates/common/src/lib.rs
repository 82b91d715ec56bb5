// ================
// common/src/lib.rs
// ================
//! Shared domain types for the taskboard API.
//!
//! Entities and request payloads are serialized in camelCase to match the
//! JSON wire format the clients and the API playground expect.

use serde::{Deserialize, Serialize};

/// Entity identifier type. Ids are auto-incremented per entity map.
pub type Id = i64;

/// A registered user. The `password` field holds the scrypt PHC hash,
/// never the plaintext, and the struct is deliberately not serializable:
/// everything that leaves the server goes through [`SafeUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub password: String,
}

impl User {
    /// The client-facing view of a user, with the password hash stripped.
    pub fn sanitized(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// A user as returned to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SafeUser {
    pub id: Id,
    pub username: String,
}

/// Top-level container owned by one user.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    /// Owner. Every operation on the board and its children requires the
    /// requester to match this id.
    pub user_id: Id,
}

/// Column within a board.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Id,
    pub title: String,
    pub board_id: Id,
}

/// Task unit within a list. Soft-deletable: `is_deleted` is a tombstone,
/// deleted cards stay in the store but are excluded from all reads.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<String>,
    pub list_id: Id,
    pub labels: Vec<String>,
    pub attachments: Vec<String>,
    pub is_deleted: bool,
}

/// Credentials body for register / login / token endpoints. Fields are
/// optional so that missing values surface as API-level errors rather
/// than deserialization rejections.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Create / update payload for boards. On create `name` is required; on
/// update absent fields are left untouched.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoardPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Create / update payload for lists.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    pub title: Option<String>,
}

/// Create / patch payload for cards.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub labels: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
}

/// Sort direction for card listings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Pagination window. Only active when the client supplies both `page`
/// and `limit`; pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    /// Build from the raw query values, activating pagination only when
    /// both are present and at least 1.
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Option<Self> {
        match (page, limit) {
            (Some(page), Some(limit)) if page >= 1 && limit >= 1 => {
                Some(Self { page, limit })
            },
            _ => None,
        }
    }
}

/// One page of results plus the pre-pagination total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Search filters for `/api/boards/search`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BoardSearch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Search filters for `/api/cards/search`. `due` accepts `overdue`,
/// `today`, `upcoming` or a date substring.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CardSearch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub due: Option<String>,
}
