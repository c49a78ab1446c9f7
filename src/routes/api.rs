// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::models::{
    ActivityType, FitnessGoal, MatchStatus, OnboardingProfile, ProfileUpdate, SkillLevel, User,
};
use crate::routes::auth::expired_session_cookie;
use crate::services::DirectoryFilter;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes for any signed-in user, onboarded or not.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/onboarding", post(complete_onboarding))
        .route("/api/reset", post(reset_demo))
}

/// Routes that need a completed profile.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/directory", get(browse_directory))
        .route("/api/users/{id}", get(get_buddy))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;
    Ok(Json(user))
}

/// Partial profile edit. Rejected until onboarding is done.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    let user = state.sessions.update_profile(&auth.user_id, update)?;
    Ok(Json(user))
}

async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(profile): Json<OnboardingProfile>,
) -> Result<Json<User>> {
    let user = state.sessions.complete_onboarding(&auth.user_id, profile)?;
    Ok(Json(user))
}

// ─── Demo Reset ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Wipe all local data. Ends the session, so the cookie goes too.
async fn reset_demo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
    Json(req): Json<ResetRequest>,
) -> Result<(CookieJar, StatusCode)> {
    if !req.confirm {
        return Err(AppError::BadRequest(
            "Reset must be confirmed".to_string(),
        ));
    }

    tracing::info!(user_id = %auth.user_id, "Demo reset requested");
    state.sessions.reset_demo()?;

    let secure = state.config.frontend_url.starts_with("https://");
    Ok((jar.add(expired_session_cookie(secure)), StatusCode::NO_CONTENT))
}

// ─── Directory ───────────────────────────────────────────────

/// Raw directory query string. `activity=All` (or empty) means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub activity: Option<String>,
    pub skill_level: Option<SkillLevel>,
    pub goal: Option<FitnessGoal>,
    pub max_distance_km: Option<f64>,
}

impl DirectoryQuery {
    fn into_filter(self) -> Result<DirectoryFilter> {
        let activity = match self.activity.as_deref().map(str::trim) {
            None | Some("") | Some("All") => None,
            Some(name) => Some(parse_activity(name)?),
        };
        if let Some(km) = self.max_distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(AppError::BadRequest(
                    "max_distance_km must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(DirectoryFilter {
            activity,
            skill_level: self.skill_level,
            goal: self.goal,
            max_distance_km: self.max_distance_km,
        })
    }
}

fn parse_activity(name: &str) -> Result<ActivityType> {
    ActivityType::ALL
        .iter()
        .copied()
        .find(|a| a.as_str() == name)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown activity: {}", name)))
}

/// A directory profile plus where the caller stands with them.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub user: User,
    /// Status of the open request or match with this buddy, if any
    pub connection: Option<MatchStatus>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DirectoryResponse {
    pub buddies: Vec<DirectoryEntry>,
}

async fn browse_directory(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<DirectoryResponse>> {
    let filter = query.into_filter()?;
    let buddies = state.directory.browse(&me, &filter)?;
    let matches = state.matches.get_matches_for(&me.id)?;

    let buddies = buddies
        .into_iter()
        .map(|user| {
            let connection = matches
                .iter()
                .filter(|m| m.is_open() && m.connects(&me.id, &user.id))
                .map(|m| m.status)
                .last();
            DirectoryEntry { user, connection }
        })
        .collect();

    Ok(Json(DirectoryResponse { buddies }))
}

async fn get_buddy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .directory
        .find(&id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(user))
}
