// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat routes between matched buddies.

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::ChatMessage;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/chats/{buddy_id}/messages",
        get(get_messages).post(send_message),
    )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

async fn get_messages(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Path(buddy_id): Path<String>,
) -> Result<Json<MessagesResponse>> {
    let messages = state.chat.conversation(&me.id, &buddy_id)?;
    Ok(Json(MessagesResponse { messages }))
}

#[derive(Deserialize)]
pub struct SendMessageBody {
    pub text: String,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Path(buddy_id): Path<String>,
    Json(body): Json<SendMessageBody>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let message = state.chat.send_message(&me.id, &buddy_id, &body.text)?;
    Ok((StatusCode::CREATED, Json(message)))
}
