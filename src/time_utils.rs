// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for timestamps and identifiers.

use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};

/// Current time as unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Random 96-bit hex identifier for users, matches and messages.
pub fn new_id() -> anyhow::Result<String> {
    let mut bytes = [0u8; 12];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("system random source unavailable"))?;
    Ok(hex::encode(bytes))
}
