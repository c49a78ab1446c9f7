// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and logout routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, session_token, verify_jwt, SESSION_COOKIE};
use crate::models::User;
use crate::services::Credentials;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Cookies are only marked `Secure` when the frontend is served over HTTPS.
fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Removal cookie matching the attributes the session cookie was created with.
pub(crate) fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

fn uses_https(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}

/// Log in (or sign up) and start a new session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let (user, session) = state.sessions.authenticate(&credentials)?;

    let token = create_jwt(&session, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(token.clone(), uses_https(&state)));
    Ok((jar, Json(LoginResponse { token, user })))
}

/// End the session named by the caller's token, and clear the cookie.
///
/// A missing or stale token still gets the cookie cleared, but never ends
/// someone else's session.
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    let claims = session_token(&jar, &headers)
        .and_then(|token| verify_jwt(&token, &state.config.session_signing_key).ok());

    if let Some(claims) = claims {
        let active = state.sessions.current_session()?;
        if active.is_some_and(|s| s.session_id == claims.sid) {
            state.sessions.logout()?;
        }
    }

    let jar = jar.add(expired_session_cookie(uses_https(&state)));
    Ok((jar, StatusCode::NO_CONTENT))
}
