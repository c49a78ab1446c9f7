// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Direct messages between matched buddies.

use crate::db::LocalStore;
use crate::error::{AppError, Result};
use crate::models::ChatMessage;
use crate::services::MatchService;
use crate::time_utils::{new_id, now_millis};

const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Clone)]
pub struct ChatService {
    store: LocalStore,
    matches: MatchService,
}

impl ChatService {
    pub fn new(store: LocalStore, matches: MatchService) -> Self {
        Self { store, matches }
    }

    pub fn send_message(&self, sender_id: &str, buddy_id: &str, text: &str) -> Result<ChatMessage> {
        self.require_match(sender_id, buddy_id)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Message text is empty".to_string()));
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::BadRequest(format!(
                "Message exceeds {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        let message = ChatMessage {
            id: new_id()?,
            sender_id: sender_id.to_string(),
            receiver_id: buddy_id.to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
        };
        self.store.put_message(&message)?;

        tracing::debug!(message_id = %message.id, sender_id, buddy_id, "Message sent");
        Ok(message)
    }

    pub fn conversation(&self, viewer_id: &str, buddy_id: &str) -> Result<Vec<ChatMessage>> {
        self.require_match(viewer_id, buddy_id)?;
        self.store.list_conversation(viewer_id, buddy_id)
    }

    /// Messaging is only unlocked by an accepted match.
    fn require_match(&self, a: &str, b: &str) -> Result<()> {
        if self.matches.is_matched(a, b)? {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Messaging requires an accepted match".to_string(),
            ))
        }
    }
}
