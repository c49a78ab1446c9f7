// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod matches;
pub mod message;
pub mod session;
pub mod user;

pub use matches::{Match, MatchStatus, RequestAction};
pub use message::ChatMessage;
pub use session::Session;
pub use user::{
    ActivityType, FitnessGoal, Gender, Location, OnboardingProfile, ProfileUpdate, SkillLevel,
    User,
};
