// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer: a typed store over a string key-value backend.

pub mod backend;
pub mod local_store;

pub use backend::{FileBackend, KvBackend, MemoryBackend, StorageError};
pub use local_store::LocalStore;

/// Storage keys as constants.
pub mod keys {
    pub const USERS: &str = "fitbuddy_users";
    pub const SESSION: &str = "fitbuddy_session";
    pub const MATCHES: &str = "fitbuddy_matches";
    pub const MESSAGES: &str = "fitbuddy_messages";
}
