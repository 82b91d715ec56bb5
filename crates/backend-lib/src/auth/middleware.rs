// ============================
// crates/backend-lib/src/auth/middleware.rs
// ============================
//! Multi-scheme request authentication.
//!
//! Every resource route passes through [`authenticate`], which tries the
//! schemes in fixed priority order: established session, then bearer
//! token, then HTTP Basic. The order is a cost/trust ranking (session is
//! already trusted, bearer needs one lookup, basic re-derives the
//! password hash) and must not be changed. A scheme failure falls through
//! to the next scheme; only exhaustion of all three rejects the request,
//! with a generic message that does not reveal which scheme failed.
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use metrics::counter;
use std::sync::Arc;
use taskboard_common::{Id, User};

use crate::{auth::password, error::AppError, storage::Storage, AppState};

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "taskboard_session";

/// The authenticated identity attached to the request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Id,
    pub username: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Middleware guarding all resource routes. Attaches an [`AuthUser`]
/// extension on success, rejects with 401 otherwise.
pub async fn authenticate<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match resolve_identity(&state, request.headers()).await? {
        Some(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        },
        None => {
            counter!("auth.rejected").increment(1);
            Err(AppError::Unauthorized)
        },
    }
}

/// Walk the scheme chain. `Ok(None)` means every scheme fell through.
async fn resolve_identity<S: Storage + Send + Sync>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, AppError> {
    // 1. Session cookie: resolve the identity directly from the session
    //    store. A valid session wins even if an Authorization header is
    //    also present.
    if let Some(token) = session_cookie(headers) {
        if let Some(session) = state.sessions.get(&token).await {
            if let Some(user) = state.storage.get_user(session.user_id).await? {
                return Ok(Some(AuthUser::from(&user)));
            }
        }
        tracing::debug!("session auth failed, falling through");
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    // 2. Bearer token: verify signature and expiry, then look the user up.
    if let Some(token) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        match state.tokens.verify(token) {
            Ok(claims) => {
                if let Some(user) = state.storage.get_user(claims.sub).await? {
                    return Ok(Some(AuthUser::from(&user)));
                }
                tracing::debug!(user_id = claims.sub, "bearer token for unknown user");
            },
            Err(err) => tracing::debug!(%err, "bearer auth failed, falling through"),
        }
    }

    // 3. Basic credentials: decode, look up, verify the password.
    if let Some(encoded) = auth_header.and_then(|h| h.strip_prefix("Basic ")) {
        if let Some((username, supplied)) = decode_basic(encoded) {
            if let Some(user) = state.storage.get_user_by_username(&username).await? {
                // scrypt is CPU-bound; keep it off the async workers
                let hash = user.password.clone();
                let ok =
                    tokio::task::spawn_blocking(move || password::verify_password(&hash, &supplied))
                        .await
                        .map_err(|e| AppError::Internal(e.to_string()))?;
                if ok {
                    return Ok(Some(AuthUser::from(&user)));
                }
            }
        }
        tracing::debug!("basic auth failed");
    }

    Ok(None)
}

/// Extract the session token from the Cookie header, if present.
pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Decode a Basic credential into `(username, password)`.
fn decode_basic(encoded: &str) -> Option<(String, String)> {
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
