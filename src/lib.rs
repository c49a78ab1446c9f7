// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitbuddy: find a training partner nearby
//!
//! This crate provides the local core behind the buddy-finder UI: profile
//! storage, demo login and onboarding, the buddy directory, connection
//! requests and matches, and chat between matched buddies.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::LocalStore;
use services::{ChatService, DirectoryService, MatchService, SessionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    pub sessions: SessionService,
    pub matches: MatchService,
    pub directory: DirectoryService,
    pub chat: ChatService,
}

impl AppState {
    /// Wire every service to the same store.
    pub fn new(config: Config, store: LocalStore) -> Self {
        let matches = MatchService::new(store.clone());
        Self {
            sessions: SessionService::new(store.clone()),
            directory: DirectoryService::new(store.clone(), config.seed_directory),
            chat: ChatService::new(store.clone(), matches.clone()),
            matches,
            store,
            config,
        }
    }
}
