// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Persisted login session.

use serde::{Deserialize, Serialize};

/// The single active session for this instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    /// Regenerated on every login; tokens carrying an older id are stale
    pub session_id: String,
    /// Login time (unix milliseconds)
    pub started_at: i64,
}
