// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with an in-memory implementation.
//!
//! Entities live in per-type maps keyed by auto-incrementing integer ids.
//! Card deletion is a tombstone: the record stays but is excluded from
//! every normal read. Collection reads return items in id order so that
//! pagination is deterministic.
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use taskboard_common::{
    Board, BoardPayload, BoardSearch, Card, CardPayload, CardSearch, Id, List, ListPayload, Page,
    PageParams, SortOrder, User,
};

use crate::error::AppError;

/// Listing options for cards: optional pagination plus optional sorting
/// by an arbitrary field.
#[derive(Debug, Clone, Default)]
pub struct CardListQuery {
    pub page: Option<PageParams>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn get_user(&self, id: Id) -> Result<Option<User>, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    /// Create a user, claiming the username atomically. Returns `None`
    /// if the username is already taken.
    async fn create_user(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<Option<User>, AppError>;

    // Board operations
    async fn boards_for_user(
        &self,
        user_id: Id,
        page: Option<PageParams>,
    ) -> Result<Page<Board>, AppError>;
    async fn search_boards(&self, user_id: Id, query: &BoardSearch)
        -> Result<Vec<Board>, AppError>;
    async fn get_board(&self, id: Id) -> Result<Option<Board>, AppError>;
    async fn create_board(
        &self,
        user_id: Id,
        name: String,
        description: Option<String>,
    ) -> Result<Board, AppError>;
    async fn update_board(&self, id: Id, patch: &BoardPayload)
        -> Result<Option<Board>, AppError>;
    async fn delete_board(&self, id: Id) -> Result<bool, AppError>;

    // List operations
    async fn lists_for_board(
        &self,
        board_id: Id,
        page: Option<PageParams>,
    ) -> Result<Page<List>, AppError>;
    async fn get_list(&self, id: Id) -> Result<Option<List>, AppError>;
    async fn create_list(&self, board_id: Id, title: String) -> Result<List, AppError>;
    async fn update_list(&self, id: Id, patch: &ListPayload) -> Result<Option<List>, AppError>;
    async fn delete_list(&self, id: Id) -> Result<bool, AppError>;

    // Card operations
    async fn cards_for_list(
        &self,
        list_id: Id,
        query: &CardListQuery,
    ) -> Result<Page<Card>, AppError>;
    async fn search_cards(&self, user_id: Id, query: &CardSearch) -> Result<Vec<Card>, AppError>;
    /// Get a live card. Tombstoned cards resolve to `None`.
    async fn get_card(&self, id: Id) -> Result<Option<Card>, AppError>;
    /// Get a card record regardless of tombstone state. Only the delete
    /// path may use this; every client-facing read goes through
    /// [`Storage::get_card`].
    async fn get_card_record(&self, id: Id) -> Result<Option<Card>, AppError>;
    async fn create_card(&self, list_id: Id, payload: CardPayload) -> Result<Card, AppError>;
    async fn update_card(&self, id: Id, patch: &CardPayload) -> Result<Option<Card>, AppError>;
    /// Tombstone a card. Returns true if the record exists, regardless of
    /// prior tombstone state, so repeated deletes stay idempotent.
    async fn delete_card(&self, id: Id) -> Result<bool, AppError>;
}

/// In-memory implementation of the Storage trait
pub struct MemStorage {
    users: DashMap<Id, User>,
    /// Username -> user id index. Usernames are claimed here first, under
    /// the shard lock, so two concurrent registrations cannot both win.
    usernames: DashMap<String, Id>,
    boards: DashMap<Id, Board>,
    lists: DashMap<Id, List>,
    cards: DashMap<Id, Card>,
    next_user_id: AtomicI64,
    next_board_id: AtomicI64,
    next_list_id: AtomicI64,
    next_card_id: AtomicI64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            usernames: DashMap::new(),
            boards: DashMap::new(),
            lists: DashMap::new(),
            cards: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            next_board_id: AtomicI64::new(1),
            next_list_id: AtomicI64::new(1),
            next_card_id: AtomicI64::new(1),
        }
    }
}

fn next_id(counter: &AtomicI64) -> Id {
    counter.fetch_add(1, AtomicOrdering::SeqCst)
}

/// Slice out the requested window, keeping the pre-pagination total.
fn paginate<T>(items: Vec<T>, page: Option<PageParams>) -> Page<T> {
    let total = items.len();
    match page {
        Some(p) => {
            let start = (p.page as usize - 1) * p.limit as usize;
            let items = items
                .into_iter()
                .skip(start)
                .take(p.limit as usize)
                .collect();
            Page { items, total }
        },
        None => Page { items, total },
    }
}

/// Value of a card field for sorting purposes. Unknown fields yield
/// `None` for every card, which leaves the id order unchanged.
fn card_sort_value(card: &Card, field: &str) -> Option<String> {
    match field {
        "title" => Some(card.title.clone()),
        "description" => card.description.clone(),
        "status" => Some(card.status.clone()),
        "dueDate" => card.due_date.clone(),
        // zero-padded so string comparison matches numeric order
        "id" => Some(format!("{:020}", card.id)),
        _ => None,
    }
}

/// Null placement: last when ascending, first when descending.
fn compare_sort_values(a: Option<String>, b: Option<String>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => match order {
            SortOrder::Asc => Ordering::Greater,
            SortOrder::Desc => Ordering::Less,
        },
        (Some(_), None) => match order {
            SortOrder::Asc => Ordering::Less,
            SortOrder::Desc => Ordering::Greater,
        },
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
    }
}

/// Interpret a stored due date. Accepts RFC 3339 or a bare `YYYY-MM-DD`.
fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Match a card's due date against a search term: the keywords
/// `overdue` / `today` / `upcoming`, or a plain substring.
fn due_matches(due_date: &str, term: &str) -> bool {
    match term {
        "overdue" | "today" | "upcoming" => {
            let Some(due) = parse_due(due_date) else {
                return false;
            };
            let now = Utc::now();
            match term {
                "overdue" => due < now,
                "today" => due.date_naive() == now.date_naive(),
                _ => due > now,
            }
        },
        _ => due_date.contains(term),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Id) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.usernames.get(username).map(|entry| *entry) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn create_user(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<Option<User>, AppError> {
        // The vacant entry holds the shard lock until the id is written,
        // so the username claim and the insert are one atomic step.
        match self.usernames.entry(username.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let id = next_id(&self.next_user_id);
                slot.insert(id);
                let user = User {
                    id,
                    username,
                    password: password_hash,
                };
                self.users.insert(id, user.clone());
                Ok(Some(user))
            },
        }
    }

    async fn boards_for_user(
        &self,
        user_id: Id,
        page: Option<PageParams>,
    ) -> Result<Page<Board>, AppError> {
        let mut boards: Vec<Board> = self
            .boards
            .iter()
            .filter(|board| board.user_id == user_id)
            .map(|board| board.clone())
            .collect();
        boards.sort_by_key(|board| board.id);
        Ok(paginate(boards, page))
    }

    async fn search_boards(
        &self,
        user_id: Id,
        query: &BoardSearch,
    ) -> Result<Vec<Board>, AppError> {
        let mut boards: Vec<Board> = self
            .boards
            .iter()
            .filter(|board| board.user_id == user_id)
            .filter(|board| {
                if let Some(name) = &query.name {
                    if !contains_ci(&board.name, name) {
                        return false;
                    }
                }
                if let Some(description) = &query.description {
                    match &board.description {
                        Some(text) => {
                            if !contains_ci(text, description) {
                                return false;
                            }
                        },
                        None => return false,
                    }
                }
                true
            })
            .map(|board| board.clone())
            .collect();
        boards.sort_by_key(|board| board.id);
        Ok(boards)
    }

    async fn get_board(&self, id: Id) -> Result<Option<Board>, AppError> {
        Ok(self.boards.get(&id).map(|board| board.clone()))
    }

    async fn create_board(
        &self,
        user_id: Id,
        name: String,
        description: Option<String>,
    ) -> Result<Board, AppError> {
        let id = next_id(&self.next_board_id);
        let board = Board {
            id,
            name,
            description,
            user_id,
        };
        self.boards.insert(id, board.clone());
        Ok(board)
    }

    async fn update_board(
        &self,
        id: Id,
        patch: &BoardPayload,
    ) -> Result<Option<Board>, AppError> {
        match self.boards.get_mut(&id) {
            Some(mut board) => {
                if let Some(name) = &patch.name {
                    board.name = name.clone();
                }
                if let Some(description) = &patch.description {
                    board.description = Some(description.clone());
                }
                Ok(Some(board.clone()))
            },
            None => Ok(None),
        }
    }

    async fn delete_board(&self, id: Id) -> Result<bool, AppError> {
        Ok(self.boards.remove(&id).is_some())
    }

    async fn lists_for_board(
        &self,
        board_id: Id,
        page: Option<PageParams>,
    ) -> Result<Page<List>, AppError> {
        let mut lists: Vec<List> = self
            .lists
            .iter()
            .filter(|list| list.board_id == board_id)
            .map(|list| list.clone())
            .collect();
        lists.sort_by_key(|list| list.id);
        Ok(paginate(lists, page))
    }

    async fn get_list(&self, id: Id) -> Result<Option<List>, AppError> {
        Ok(self.lists.get(&id).map(|list| list.clone()))
    }

    async fn create_list(&self, board_id: Id, title: String) -> Result<List, AppError> {
        let id = next_id(&self.next_list_id);
        let list = List {
            id,
            title,
            board_id,
        };
        self.lists.insert(id, list.clone());
        Ok(list)
    }

    async fn update_list(&self, id: Id, patch: &ListPayload) -> Result<Option<List>, AppError> {
        match self.lists.get_mut(&id) {
            Some(mut list) => {
                if let Some(title) = &patch.title {
                    list.title = title.clone();
                }
                Ok(Some(list.clone()))
            },
            None => Ok(None),
        }
    }

    async fn delete_list(&self, id: Id) -> Result<bool, AppError> {
        Ok(self.lists.remove(&id).is_some())
    }

    async fn cards_for_list(
        &self,
        list_id: Id,
        query: &CardListQuery,
    ) -> Result<Page<Card>, AppError> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|card| card.list_id == list_id && !card.is_deleted)
            .map(|card| card.clone())
            .collect();
        cards.sort_by_key(|card| card.id);

        if let Some(field) = &query.sort {
            let order = query.order.unwrap_or(SortOrder::Asc);
            // stable sort keeps id order within equal keys
            cards.sort_by(|a, b| {
                compare_sort_values(card_sort_value(a, field), card_sort_value(b, field), order)
            });
        }

        Ok(paginate(cards, query.page))
    }

    async fn search_cards(&self, user_id: Id, query: &CardSearch) -> Result<Vec<Card>, AppError> {
        // Walk the ownership chain downwards: boards -> lists -> cards.
        let board_ids: Vec<Id> = self
            .boards
            .iter()
            .filter(|board| board.user_id == user_id)
            .map(|board| board.id)
            .collect();
        let list_ids: Vec<Id> = self
            .lists
            .iter()
            .filter(|list| board_ids.contains(&list.board_id))
            .map(|list| list.id)
            .collect();

        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|card| list_ids.contains(&card.list_id) && !card.is_deleted)
            .filter(|card| {
                if let Some(title) = &query.title {
                    if !contains_ci(&card.title, title) {
                        return false;
                    }
                }
                if let Some(description) = &query.description {
                    match &card.description {
                        Some(text) => {
                            if !contains_ci(text, description) {
                                return false;
                            }
                        },
                        None => return false,
                    }
                }
                if let Some(label) = &query.label {
                    if !card.labels.iter().any(|l| contains_ci(l, label)) {
                        return false;
                    }
                }
                if let Some(due) = &query.due {
                    match &card.due_date {
                        Some(date) => {
                            if !due_matches(date, due) {
                                return false;
                            }
                        },
                        None => return false,
                    }
                }
                true
            })
            .map(|card| card.clone())
            .collect();
        cards.sort_by_key(|card| card.id);
        Ok(cards)
    }

    async fn get_card(&self, id: Id) -> Result<Option<Card>, AppError> {
        Ok(self
            .cards
            .get(&id)
            .filter(|card| !card.is_deleted)
            .map(|card| card.clone()))
    }

    async fn get_card_record(&self, id: Id) -> Result<Option<Card>, AppError> {
        Ok(self.cards.get(&id).map(|card| card.clone()))
    }

    async fn create_card(&self, list_id: Id, payload: CardPayload) -> Result<Card, AppError> {
        let id = next_id(&self.next_card_id);
        let card = Card {
            id,
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            status: payload.status.unwrap_or_else(|| "todo".to_string()),
            due_date: payload.due_date,
            list_id,
            labels: payload.labels.unwrap_or_default(),
            attachments: payload.attachments.unwrap_or_default(),
            is_deleted: false,
        };
        self.cards.insert(id, card.clone());
        Ok(card)
    }

    async fn update_card(&self, id: Id, patch: &CardPayload) -> Result<Option<Card>, AppError> {
        match self.cards.get_mut(&id) {
            Some(mut card) if !card.is_deleted => {
                if let Some(title) = &patch.title {
                    card.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    card.description = Some(description.clone());
                }
                if let Some(status) = &patch.status {
                    card.status = status.clone();
                }
                if let Some(due_date) = &patch.due_date {
                    card.due_date = Some(due_date.clone());
                }
                if let Some(labels) = &patch.labels {
                    card.labels = labels.clone();
                }
                if let Some(attachments) = &patch.attachments {
                    card.attachments = attachments.clone();
                }
                Ok(Some(card.clone()))
            },
            _ => Ok(None),
        }
    }

    async fn delete_card(&self, id: Id) -> Result<bool, AppError> {
        match self.cards.get_mut(&id) {
            Some(mut card) => {
                card.is_deleted = true;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
