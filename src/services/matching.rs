// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection request lifecycle.
//!
//! A request starts `pending` and is resolved exactly once, by its receiver,
//! to `accepted` or `declined`. At most one pending or accepted record may
//! exist per pair of users; a declined record does not block a new request.

use crate::db::LocalStore;
use crate::error::{AppError, Result};
use crate::models::{Match, MatchStatus, RequestAction, User};
use crate::time_utils::{new_id, now_millis};

/// Create and resolve connection requests.
#[derive(Clone)]
pub struct MatchService {
    store: LocalStore,
}

impl MatchService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Send a connection request from `sender_id` to `receiver`.
    pub fn send_request(&self, sender_id: &str, receiver: &User) -> Result<Match> {
        if sender_id == receiver.id {
            return Err(AppError::InvalidOperation(
                "Cannot send a request to yourself".to_string(),
            ));
        }

        let sender = self
            .store
            .get_user(sender_id)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", sender_id)))?;

        let record = Match {
            id: new_id()?,
            sender_id: sender.id.clone(),
            receiver_id: receiver.id.clone(),
            buddy: receiver.clone(),
            requester: sender,
            status: MatchStatus::Pending,
            timestamp: now_millis(),
        };

        let conflict = self.store.insert_match_unless(&record, |m| {
            m.is_open() && m.connects(sender_id, &receiver.id)
        })?;

        if let Some(existing) = conflict {
            tracing::debug!(
                sender_id,
                receiver_id = %receiver.id,
                existing_id = %existing.id,
                status = existing.status.as_str(),
                "Rejected duplicate connection request"
            );
            return Err(AppError::InvalidState(format!(
                "A {} connection already exists with {}",
                existing.status.as_str(),
                receiver.name
            )));
        }

        tracing::info!(
            match_id = %record.id,
            sender_id,
            receiver_id = %record.receiver_id,
            "Connection request sent"
        );

        Ok(record)
    }

    /// Accept or decline a pending request addressed to `acting_user_id`.
    pub fn respond_to_request(
        &self,
        acting_user_id: &str,
        request_id: &str,
        action: RequestAction,
    ) -> Result<Match> {
        let updated = self.store.modify_match(request_id, |m| {
            if m.receiver_id != acting_user_id {
                return Err(AppError::Forbidden(
                    "Only the receiver can respond to a request".to_string(),
                ));
            }
            if !m.is_pending() {
                return Err(AppError::InvalidState(format!(
                    "Request already {}",
                    m.status.as_str()
                )));
            }
            m.status = action.resulting_status();
            Ok(())
        })?;

        tracing::info!(
            match_id = %updated.id,
            acting_user_id,
            status = updated.status.as_str(),
            "Connection request resolved"
        );

        Ok(updated)
    }

    /// Every request involving `user_id`, oldest first.
    pub fn get_matches_for(&self, user_id: &str) -> Result<Vec<Match>> {
        self.store.list_matches(user_id)
    }

    /// True when `a` and `b` share an accepted match.
    pub fn is_matched(&self, a: &str, b: &str) -> Result<bool> {
        Ok(self
            .store
            .list_matches(a)?
            .iter()
            .any(|m| m.status == MatchStatus::Accepted && m.connects(a, b)))
    }
}

/// Pending requests waiting on `user_id` to answer.
pub fn pending_incoming<'a>(matches: &'a [Match], user_id: &str) -> Vec<&'a Match> {
    matches
        .iter()
        .filter(|m| m.is_pending() && m.receiver_id == user_id)
        .collect()
}

/// Pending requests `user_id` has sent.
pub fn pending_outgoing<'a>(matches: &'a [Match], user_id: &str) -> Vec<&'a Match> {
    matches
        .iter()
        .filter(|m| m.is_pending() && m.sender_id == user_id)
        .collect()
}

/// Accepted matches, whichever side initiated.
pub fn active_matches(matches: &[Match]) -> Vec<&Match> {
    matches
        .iter()
        .filter(|m| m.status == MatchStatus::Accepted)
        .collect()
}
