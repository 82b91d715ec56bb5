// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request payload validation.
//!
//! Violations are collected per field and surfaced as a 400 with
//! structured detail, so the API playground can show learners exactly
//! which field failed.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use taskboard_common::{BoardPayload, CardPayload, Credentials, ListPayload};

use crate::error::AppError;

// Length limits
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_NAME_LENGTH: usize = 100;
const MAX_TITLE_LENGTH: usize = 200;
const MAX_STATUS_LENGTH: usize = 50;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap());

/// A single field-level validation failure.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn finish(entity: &'static str, errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation { entity, errors })
    }
}

/// Validate a registration payload. Username format is restricted;
/// passwords only have to be non-empty (this is a teaching playground,
/// not a production identity provider).
pub fn validate_registration(payload: &Credentials) -> Result<(), AppError> {
    let mut errors = Vec::new();

    match payload.username.as_deref() {
        None | Some("") => errors.push(FieldError::new("username", "Username is required")),
        Some(username) if username.len() > MAX_USERNAME_LENGTH => errors.push(FieldError::new(
            "username",
            format!("Username must be at most {MAX_USERNAME_LENGTH} characters"),
        )),
        Some(username) if !USERNAME_REGEX.is_match(username) => errors.push(FieldError::new(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        )),
        Some(_) => {},
    }

    if payload.password.as_deref().unwrap_or("").is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    finish("user", errors)
}

/// Validate a board payload. `name` is only required on creation.
pub fn validate_board(payload: &BoardPayload, creating: bool) -> Result<(), AppError> {
    let mut errors = Vec::new();

    match payload.name.as_deref() {
        None if creating => errors.push(FieldError::new("name", "Name is required")),
        Some("") => errors.push(FieldError::new("name", "Name must not be empty")),
        Some(name) if name.len() > MAX_NAME_LENGTH => errors.push(FieldError::new(
            "name",
            format!("Name must be at most {MAX_NAME_LENGTH} characters"),
        )),
        _ => {},
    }

    if let Some(description) = &payload.description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(FieldError::new(
                "description",
                format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            ));
        }
    }

    finish("board", errors)
}

/// Validate a list payload. `title` is only required on creation.
pub fn validate_list(payload: &ListPayload, creating: bool) -> Result<(), AppError> {
    let mut errors = Vec::new();

    match payload.title.as_deref() {
        None if creating => errors.push(FieldError::new("title", "Title is required")),
        Some("") => errors.push(FieldError::new("title", "Title must not be empty")),
        Some(title) if title.len() > MAX_TITLE_LENGTH => errors.push(FieldError::new(
            "title",
            format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
        )),
        _ => {},
    }

    finish("list", errors)
}

/// Validate a card payload. `title` is only required on creation.
pub fn validate_card(payload: &CardPayload, creating: bool) -> Result<(), AppError> {
    let mut errors = Vec::new();

    match payload.title.as_deref() {
        None if creating => errors.push(FieldError::new("title", "Title is required")),
        Some("") => errors.push(FieldError::new("title", "Title must not be empty")),
        Some(title) if title.len() > MAX_TITLE_LENGTH => errors.push(FieldError::new(
            "title",
            format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
        )),
        _ => {},
    }

    if let Some(status) = &payload.status {
        if status.is_empty() || status.len() > MAX_STATUS_LENGTH {
            errors.push(FieldError::new(
                "status",
                format!("Status must be between 1 and {MAX_STATUS_LENGTH} characters"),
            ));
        }
    }

    if let Some(description) = &payload.description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(FieldError::new(
                "description",
                format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            ));
        }
    }

    finish("card", errors)
}
