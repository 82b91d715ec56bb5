// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration, login, token issuance and logout.
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use taskboard_common::{Credentials, SafeUser, User};

use crate::auth::{hash_password, middleware::session_cookie, verify_password, AuthUser, SESSION_COOKIE};
use crate::error::AppError;
use crate::storage::Storage;
use crate::validation;
use crate::AppState;

/// Login / token response: the sanitized user plus a bearer token.
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: SafeUser,
    pub token: String,
}

/// POST /api/register — create an account and log it straight in.
pub async fn register<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_registration(&payload)?;
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    // Cheap early rejection; the authoritative uniqueness check is the
    // atomic claim inside create_user, after the slow hash.
    if state
        .storage
        .get_user_by_username(&username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    // scrypt is CPU-bound; keep it off the async workers
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let user = state
        .storage
        .create_user(username, hash)
        .await?
        .ok_or_else(|| AppError::BadRequest("Username already exists".to_string()))?;
    let session = state.sessions.create(user.id).await;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        set_session_cookie(&session),
        Json(user.sanitized()),
    ))
}

/// POST /api/login — session + bearer token from credentials.
pub async fn login<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let user = check_credentials(&state, payload)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let safe = user.sanitized();
    let token = state
        .tokens
        .issue(&safe)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let session = state.sessions.create(user.id).await;
    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        set_session_cookie(&session),
        Json(AuthResponse { user: safe, token }),
    ))
}

/// POST /api/token — bearer token without a session, for pure API
/// clients.
pub async fn token<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    if payload.username.as_deref().unwrap_or("").is_empty()
        || payload.password.as_deref().unwrap_or("").is_empty()
    {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = check_credentials(&state, payload)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let safe = user.sanitized();
    let token = state
        .tokens
        .issue(&safe)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse { user: safe, token }))
}

/// POST /api/logout — destroy the session, clear the cookie, 200 always.
pub async fn logout<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = session_cookie(&headers) {
        state.sessions.destroy(&token).await;
    }
    Ok((
        clear_session_cookie(),
        Json(serde_json::json!({ "message": "Logged out" })),
    ))
}

/// GET /api/user — the authenticated identity, via any scheme.
pub async fn current_user(Extension(user): Extension<AuthUser>) -> Json<SafeUser> {
    Json(SafeUser {
        id: user.id,
        username: user.username,
    })
}

/// Look the user up and verify the password off the async workers.
/// `Ok(None)` covers unknown usernames, wrong passwords and missing
/// fields alike, so callers reveal nothing about which it was.
async fn check_credentials<S: Storage + Send + Sync>(
    state: &AppState<S>,
    payload: Credentials,
) -> Result<Option<User>, AppError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Ok(None);
    };
    let Some(user) = state.storage.get_user_by_username(&username).await? else {
        return Ok(None);
    };

    let hash = user.password.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(ok.then_some(user))
}

fn set_session_cookie(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) =
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"))
    {
        headers.insert(header::SET_COOKIE, value);
    }
    headers
}

fn clear_session_cookie() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static(
            // unreadable value + immediate expiry
            "taskboard_session=; Path=/; HttpOnly; Max-Age=0",
        ),
    );
    headers
}
