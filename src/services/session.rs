// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login session and profile lifecycle.
//!
//! Authentication is demo-grade: any non-empty password is accepted and never
//! stored. The session itself is persisted in the store so that it survives a
//! restart, and is torn down by logout or a full reset.

use serde::Deserialize;
use validator::Validate;

use crate::db::LocalStore;
use crate::error::{AppError, Result};
use crate::models::{OnboardingProfile, ProfileUpdate, Session, User};
use crate::time_utils::new_id;

/// Login / signup form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Display name offered at signup
    #[serde(default)]
    #[validate(length(max = 80))]
    pub name: Option<String>,
}

/// Session and profile operations over the store.
#[derive(Clone)]
pub struct SessionService {
    store: LocalStore,
}

impl SessionService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Pick up the session persisted by a previous run.
    pub fn init(&self) -> Result<Option<Session>> {
        let session = self.store.get_session()?;
        match (&session, self.store.get_session_user()?) {
            (Some(s), Some(user)) => {
                tracing::info!(user_id = %s.user_id, name = %user.name, "Restored session");
            }
            (Some(s), None) => {
                tracing::warn!(user_id = %s.user_id, "Dropping session for missing user");
                self.store.clear_session()?;
                return Ok(None);
            }
            (None, _) => tracing::debug!("No persisted session"),
        }
        Ok(session)
    }

    /// Log in, creating the account on first use.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<(User, Session)> {
        credentials.validate()?;

        let email = credentials.email.trim();
        let (user, created) = self.store.find_or_insert_user_by_email(email, || {
            Ok(User::new_signup(new_id()?, email, credentials.name.as_deref()))
        })?;
        if created {
            tracing::info!(user_id = %user.id, "Created account");
        }

        let session = self.store.set_session(&user)?;
        tracing::info!(
            user_id = %user.id,
            profile_complete = user.is_profile_complete,
            "Logged in"
        );

        Ok((user, session))
    }

    /// End the active session. Profiles and matches are kept.
    pub fn logout(&self) -> Result<()> {
        if let Some(session) = self.store.get_session()? {
            tracing::info!(user_id = %session.user_id, "Logged out");
        }
        self.store.clear_session()
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        self.store.get_session()
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        self.store.get_session_user()
    }

    /// Store the onboarding answers and mark the profile complete.
    pub fn complete_onboarding(&self, user_id: &str, profile: OnboardingProfile) -> Result<User> {
        profile.validate()?;

        let mut user = self.require_user(user_id)?;
        profile.apply_to(&mut user);
        user.is_profile_complete = true;
        self.store.put_user(&user)?;

        tracing::info!(
            user_id,
            activities = user.activities.len(),
            "Onboarding complete"
        );
        Ok(user)
    }

    /// Edit an onboarded profile.
    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        update.validate()?;

        let mut user = self.require_user(user_id)?;
        if !user.is_profile_complete {
            return Err(AppError::OnboardingRequired);
        }

        update.apply_to(&mut user);
        self.store.put_user(&user)?;

        tracing::debug!(user_id, "Profile updated");
        Ok(user)
    }

    /// Wipe every user, match, message and the session.
    pub fn reset_demo(&self) -> Result<()> {
        tracing::warn!("Resetting demo state");
        self.store.clear_all()
    }

    fn require_user(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, Gender, Location, SkillLevel};

    fn creds(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: "hunter2".to_string(),
            name: Some("Dana".to_string()),
        }
    }

    fn profile() -> OnboardingProfile {
        OnboardingProfile {
            name: "Dana Park".to_string(),
            age: 33,
            gender: Gender::Female,
            bio: "Trail runner".to_string(),
            about_me: String::new(),
            avatar: None,
            activities: vec![ActivityType::Running, ActivityType::Hiking],
            goals: vec![],
            skill_level: SkillLevel::Advanced,
            location: Location {
                lat: 40.77,
                lng: -73.96,
            },
            availability: vec!["Sat".to_string()],
        }
    }

    #[test]
    fn test_authenticate_creates_incomplete_user() {
        let service = SessionService::new(LocalStore::in_memory());

        let (user, session) = service.authenticate(&creds("dana@example.com")).unwrap();
        assert!(!user.is_profile_complete);
        assert_eq!(user.name, "Dana");
        assert_eq!(session.user_id, user.id);
        assert_eq!(service.current_user().unwrap(), Some(user));
    }

    #[test]
    fn test_authenticate_reuses_account_and_rotates_session() {
        let service = SessionService::new(LocalStore::in_memory());

        let (first, s1) = service.authenticate(&creds("dana@example.com")).unwrap();
        let (second, s2) = service.authenticate(&creds("DANA@example.com")).unwrap();

        assert_eq!(first.id, second.id);
        assert_ne!(s1.session_id, s2.session_id);
        assert_eq!(service.current_session().unwrap(), Some(s2));
    }

    #[test]
    fn test_authenticate_rejects_bad_input() {
        let service = SessionService::new(LocalStore::in_memory());

        let err = service.authenticate(&creds("not-an-email")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut empty_password = creds("dana@example.com");
        empty_password.password.clear();
        assert!(service.authenticate(&empty_password).is_err());
        assert_eq!(service.current_user().unwrap(), None);
    }

    #[test]
    fn test_logout_keeps_data() {
        let store = LocalStore::in_memory();
        let service = SessionService::new(store.clone());
        let (user, _) = service.authenticate(&creds("dana@example.com")).unwrap();

        service.logout().unwrap();

        assert_eq!(service.current_user().unwrap(), None);
        assert!(store.get_user(&user.id).unwrap().is_some());
    }

    #[test]
    fn test_onboarding_marks_profile_complete() {
        let service = SessionService::new(LocalStore::in_memory());
        let (user, _) = service.authenticate(&creds("dana@example.com")).unwrap();

        let done = service.complete_onboarding(&user.id, profile()).unwrap();
        assert!(done.is_profile_complete);
        assert_eq!(done.name, "Dana Park");
        assert_eq!(done.email, "dana@example.com");
        assert_eq!(service.current_user().unwrap(), Some(done));
    }

    #[test]
    fn test_onboarding_validation_failure_keeps_user_incomplete() {
        let service = SessionService::new(LocalStore::in_memory());
        let (user, _) = service.authenticate(&creds("dana@example.com")).unwrap();

        let mut bad = profile();
        bad.activities.clear();
        let err = service.complete_onboarding(&user.id, bad).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let current = service.current_user().unwrap().unwrap();
        assert!(!current.is_profile_complete);
    }

    #[test]
    fn test_update_profile_requires_onboarding() {
        let service = SessionService::new(LocalStore::in_memory());
        let (user, _) = service.authenticate(&creds("dana@example.com")).unwrap();

        let update = ProfileUpdate {
            bio: Some("Hello".to_string()),
            ..Default::default()
        };
        let err = service.update_profile(&user.id, update.clone()).unwrap_err();
        assert!(matches!(err, AppError::OnboardingRequired));

        service.complete_onboarding(&user.id, profile()).unwrap();
        let updated = service.update_profile(&user.id, update).unwrap();
        assert_eq!(updated.bio, "Hello");
        assert!(updated.is_profile_complete);
    }

    #[test]
    fn test_init_restores_and_drops_sessions() {
        let store = LocalStore::in_memory();
        let service = SessionService::new(store.clone());
        assert_eq!(service.init().unwrap(), None);

        let (user, session) = service.authenticate(&creds("dana@example.com")).unwrap();
        assert_eq!(SessionService::new(store.clone()).init().unwrap(), Some(session));

        // Session pointing at a user that no longer exists
        store.clear_all().unwrap();
        store.set_session(&user).unwrap();
        assert_eq!(service.init().unwrap(), None);
        assert_eq!(store.get_session().unwrap(), None);
    }

    #[test]
    fn test_reset_demo_empties_everything() {
        let store = LocalStore::in_memory();
        let service = SessionService::new(store.clone());
        let (user, _) = service.authenticate(&creds("dana@example.com")).unwrap();

        service.reset_demo().unwrap();

        assert_eq!(service.current_user().unwrap(), None);
        assert!(store.get_user(&user.id).unwrap().is_none());
        assert!(store.list_matches(&user.id).unwrap().is_empty());
    }
}
