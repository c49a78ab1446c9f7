// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod chat;
pub mod directory;
pub mod matching;
pub mod session;

pub use chat::ChatService;
pub use directory::{DirectoryFilter, DirectoryService};
pub use matching::{active_matches, pending_incoming, pending_outgoing, MatchService};
pub use session::{Credentials, SessionService};
