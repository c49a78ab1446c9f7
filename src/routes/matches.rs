// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection request and match routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::{Match, MatchStatus, RequestAction, User};
use crate::services::matching::{active_matches, pending_incoming, pending_outgoing};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/requests", post(send_request))
        .route("/api/requests/pending", get(get_pending))
        .route("/api/requests/{id}/respond", post(respond))
        .route("/api/matches", get(get_matches))
}

/// A match as seen by one side: the other person's profile, and who asked.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MatchView {
    pub id: String,
    pub status: MatchStatus,
    /// True when the viewer is the receiver
    pub incoming: bool,
    pub buddy: User,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
}

impl MatchView {
    fn new(record: &Match, viewer_id: &str) -> Self {
        Self {
            id: record.id.clone(),
            status: record.status,
            incoming: record.receiver_id == viewer_id,
            buddy: record.counterparty(viewer_id).clone(),
            timestamp: record.timestamp,
        }
    }
}

fn views(records: Vec<&Match>, viewer_id: &str) -> Vec<MatchView> {
    records
        .into_iter()
        .map(|m| MatchView::new(m, viewer_id))
        .collect()
}

#[derive(Deserialize)]
pub struct SendRequestBody {
    pub receiver_id: String,
}

async fn send_request(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Json(body): Json<SendRequestBody>,
) -> Result<(StatusCode, Json<MatchView>)> {
    let receiver = state
        .directory
        .find(&body.receiver_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", body.receiver_id)))?;

    let record = state.matches.send_request(&me.id, &receiver)?;
    Ok((StatusCode::CREATED, Json(MatchView::new(&record, &me.id))))
}

#[derive(Deserialize)]
pub struct RespondBody {
    pub action: RequestAction,
}

async fn respond(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<RespondBody>,
) -> Result<Json<MatchView>> {
    let record = state.matches.respond_to_request(&me.id, &id, body.action)?;
    Ok(Json(MatchView::new(&record, &me.id)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PendingResponse {
    pub incoming: Vec<MatchView>,
    pub outgoing: Vec<MatchView>,
}

async fn get_pending(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
) -> Result<Json<PendingResponse>> {
    let matches = state.matches.get_matches_for(&me.id)?;
    Ok(Json(PendingResponse {
        incoming: views(pending_incoming(&matches, &me.id), &me.id),
        outgoing: views(pending_outgoing(&matches, &me.id), &me.id),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MatchesResponse {
    pub matches: Vec<MatchView>,
}

async fn get_matches(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
) -> Result<Json<MatchesResponse>> {
    let matches = state.matches.get_matches_for(&me.id)?;
    Ok(Json(MatchesResponse {
        matches: views(active_matches(&matches), &me.id),
    }))
}
