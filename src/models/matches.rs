// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Connection request / match model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Declined,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Declined => "declined",
        }
    }
}

/// The receiver's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Accept,
    Decline,
}

impl RequestAction {
    pub fn resulting_status(self) -> MatchStatus {
        match self {
            RequestAction::Accept => MatchStatus::Accepted,
            RequestAction::Decline => MatchStatus::Declined,
        }
    }
}

/// Connection request between two users.
///
/// `buddy` and `requester` are snapshots taken when the request was sent and
/// are not refreshed by later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    /// Receiver profile, shown to the sender
    pub buddy: User,
    /// Sender profile, shown to the receiver
    pub requester: User,
    pub status: MatchStatus,
    /// Creation time (unix milliseconds)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
}

impl Match {
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// True when this record links `a` and `b`, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    /// Profile of the other side, as seen by `viewer_id`.
    pub fn counterparty(&self, viewer_id: &str) -> &User {
        if self.sender_id == viewer_id {
            &self.buddy
        } else {
            &self.requester
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    /// Pending and accepted records block a second request for the same pair.
    pub fn is_open(&self) -> bool {
        self.status != MatchStatus::Declined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender: &str, receiver: &str) -> Match {
        Match {
            id: "m1".to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            buddy: User::new_signup(receiver.to_string(), "b@example.com", Some("Bea")),
            requester: User::new_signup(sender.to_string(), "a@example.com", Some("Ari")),
            status: MatchStatus::Pending,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_counterparty_depends_on_viewer() {
        let m = record("a", "b");
        assert_eq!(m.counterparty("a").name, "Bea");
        assert_eq!(m.counterparty("b").name, "Ari");
    }

    #[test]
    fn test_connects_is_unordered() {
        let m = record("a", "b");
        assert!(m.connects("a", "b"));
        assert!(m.connects("b", "a"));
        assert!(!m.connects("a", "c"));
        assert!(m.involves("b"));
        assert!(!m.involves("c"));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_value(record("a", "b")).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["senderId"], "a");
        assert_eq!(json["receiverId"], "b");

        let action: RequestAction = serde_json::from_str(r#""decline""#).unwrap();
        assert_eq!(action.resulting_status(), MatchStatus::Declined);
    }

    #[test]
    fn test_declined_is_not_open() {
        let mut m = record("a", "b");
        assert!(m.is_open());
        m.status = MatchStatus::Declined;
        assert!(!m.is_open());
    }
}
