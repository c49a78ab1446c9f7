// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed store over a [`KvBackend`].
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Session (the single active login)
//! - Matches (connection requests)
//! - Messages (direct chat between matched buddies)
//!
//! Each record family lives under one key as a JSON array, kept in insertion
//! order.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::backend::{FileBackend, KvBackend, MemoryBackend};
use crate::db::keys;
use crate::error::{AppError, Result};
use crate::models::{ChatMessage, Match, MatchStatus, Session, User};
use crate::time_utils::{new_id, now_millis};

/// Store handle. Clones share the same backend.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KvBackend>,
    /// Serializes read-modify-write sequences.
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Ephemeral store (tests, demo runs without a data file).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Durable store backed by a JSON file.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = FileBackend::open(path)?;
        Ok(Self::new(Arc::new(backend)))
    }

    // ─── Encoding Helpers ──────────────────────────────────────────

    fn load<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::Storage(format!("Corrupt value under {}: {}", key, e))),
        }
    }

    fn load_list<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Storage(format!("Failed to encode {}: {}", key, e)))?;
        self.backend.set(key, raw)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::Storage("Store lock poisoned".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.load_list(keys::USERS)?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    /// Case-insensitive lookup by email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim();
        let users: Vec<User> = self.load_list(keys::USERS)?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.load_list(keys::USERS)
    }

    /// Create or update a user (by id).
    pub fn put_user(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;
        let mut users: Vec<User> = self.load_list(keys::USERS)?;

        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }

        self.save(keys::USERS, &users)
    }

    /// Return the user with `email`, creating one with `create` if absent.
    ///
    /// Lookup and insert happen under one lock so two first logins with the
    /// same email yield one account. The flag is true when a user was created.
    pub fn find_or_insert_user_by_email<F>(&self, email: &str, create: F) -> Result<(User, bool)>
    where
        F: FnOnce() -> Result<User>,
    {
        let email = email.trim();
        let _guard = self.lock()?;
        let mut users: Vec<User> = self.load_list(keys::USERS)?;

        if let Some(existing) = users.iter().find(|u| u.email.eq_ignore_ascii_case(email)) {
            return Ok((existing.clone(), false));
        }

        let user = create()?;
        users.push(user.clone());
        self.save(keys::USERS, &users)?;
        Ok((user, true))
    }

    // ─── Session Operations ──────────────────────────────────────

    pub fn get_session(&self) -> Result<Option<Session>> {
        self.load(keys::SESSION)
    }

    /// Profile for the active session, if any.
    ///
    /// A session whose user record is gone counts as no session.
    pub fn get_session_user(&self) -> Result<Option<User>> {
        let Some(session) = self.get_session()? else {
            return Ok(None);
        };

        let user = self.get_user(&session.user_id)?;
        if user.is_none() {
            tracing::warn!(user_id = %session.user_id, "Session refers to missing user");
        }
        Ok(user)
    }

    /// Start a new session for `user`, replacing any previous one.
    pub fn set_session(&self, user: &User) -> Result<Session> {
        let session = Session {
            user_id: user.id.clone(),
            session_id: new_id()?,
            started_at: now_millis(),
        };

        let _guard = self.lock()?;
        self.save(keys::SESSION, &session)?;
        Ok(session)
    }

    pub fn clear_session(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.backend.remove(keys::SESSION)?;
        Ok(())
    }

    // ─── Match Operations ────────────────────────────────────────

    /// All matches where `user_id` is sender or receiver, oldest first.
    pub fn list_matches(&self, user_id: &str) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .load_list::<Match>(keys::MATCHES)?
            .into_iter()
            .filter(|m| m.involves(user_id))
            .collect();

        // Stable sort keeps insertion order for equal timestamps
        matches.sort_by_key(|m| m.timestamp);
        Ok(matches)
    }

    pub fn get_match(&self, id: &str) -> Result<Option<Match>> {
        let matches: Vec<Match> = self.load_list(keys::MATCHES)?;
        Ok(matches.into_iter().find(|m| m.id == id))
    }

    /// Create or replace a match (by id).
    pub fn put_match(&self, record: &Match) -> Result<()> {
        let _guard = self.lock()?;
        let mut matches: Vec<Match> = self.load_list(keys::MATCHES)?;

        match matches.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => matches.push(record.clone()),
        }

        self.save(keys::MATCHES, &matches)
    }

    /// Insert `record` unless `conflict` finds an existing match.
    ///
    /// The check and the insert happen under one lock. Returns the
    /// conflicting record when there is one.
    pub fn insert_match_unless<F>(&self, record: &Match, conflict: F) -> Result<Option<Match>>
    where
        F: Fn(&Match) -> bool,
    {
        let _guard = self.lock()?;
        let mut matches: Vec<Match> = self.load_list(keys::MATCHES)?;

        if let Some(existing) = matches.iter().find(|m| conflict(m)) {
            return Ok(Some(existing.clone()));
        }

        matches.push(record.clone());
        self.save(keys::MATCHES, &matches)?;
        Ok(None)
    }

    /// Set the status of an existing match.
    pub fn update_match_status(&self, id: &str, status: MatchStatus) -> Result<Match> {
        self.modify_match(id, |m| {
            m.status = status;
            Ok(())
        })
    }

    /// Apply `f` to the stored match with `id` and persist the result.
    ///
    /// Nothing is written when `f` fails.
    pub fn modify_match<F>(&self, id: &str, f: F) -> Result<Match>
    where
        F: FnOnce(&mut Match) -> Result<()>,
    {
        let _guard = self.lock()?;
        let mut matches: Vec<Match> = self.load_list(keys::MATCHES)?;

        let record = matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Match {} not found", id)))?;

        f(record)?;
        let updated = record.clone();

        self.save(keys::MATCHES, &matches)?;
        Ok(updated)
    }

    // ─── Message Operations ──────────────────────────────────────

    pub fn put_message(&self, message: &ChatMessage) -> Result<()> {
        let _guard = self.lock()?;
        let mut messages: Vec<ChatMessage> = self.load_list(keys::MESSAGES)?;
        messages.push(message.clone());
        self.save(keys::MESSAGES, &messages)
    }

    /// Messages exchanged between `a` and `b`, oldest first.
    pub fn list_conversation(&self, a: &str, b: &str) -> Result<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = self
            .load_list::<ChatMessage>(keys::MESSAGES)?
            .into_iter()
            .filter(|m| m.between(a, b))
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    // ─── Reset ───────────────────────────────────────────────────

    /// Erase users, matches, messages and the session. Irreversible.
    pub fn clear_all(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.backend.clear()?;
        tracing::info!("Store cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User::new_signup(id.to_string(), &format!("{}@example.com", id), None)
    }

    fn pending(id: &str, sender: &str, receiver: &str, timestamp: i64) -> Match {
        Match {
            id: id.to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            buddy: user(receiver),
            requester: user(sender),
            status: MatchStatus::Pending,
            timestamp,
        }
    }

    #[test]
    fn test_missing_user_is_none() {
        let store = LocalStore::in_memory();
        assert_eq!(store.get_user("nobody").unwrap(), None);
        assert!(store.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_put_user_upserts() {
        let store = LocalStore::in_memory();
        let mut u = user("ana");
        store.put_user(&u).unwrap();

        u.bio = "Climber".to_string();
        store.put_user(&u).unwrap();

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].bio, "Climber");
    }

    #[test]
    fn test_find_user_by_email_ignores_case() {
        let store = LocalStore::in_memory();
        store.put_user(&user("ana")).unwrap();

        let found = store.find_user_by_email(" ANA@Example.com ").unwrap();
        assert_eq!(found.map(|u| u.id), Some("ana".to_string()));
    }

    #[test]
    fn test_session_round_trip() {
        let store = LocalStore::in_memory();
        let u = user("ana");
        store.put_user(&u).unwrap();

        assert_eq!(store.get_session_user().unwrap(), None);

        let session = store.set_session(&u).unwrap();
        assert_eq!(session.user_id, "ana");
        assert_eq!(store.get_session_user().unwrap().map(|u| u.id), Some("ana".to_string()));

        store.clear_session().unwrap();
        assert_eq!(store.get_session().unwrap(), None);
        // User data untouched
        assert!(store.get_user("ana").unwrap().is_some());
    }

    #[test]
    fn test_session_for_missing_user_is_none() {
        let store = LocalStore::in_memory();
        store.set_session(&user("ghost")).unwrap();
        assert_eq!(store.get_session_user().unwrap(), None);
    }

    #[test]
    fn test_list_matches_filters_and_orders_by_timestamp() {
        let store = LocalStore::in_memory();
        store.put_match(&pending("m2", "a", "b", 200)).unwrap();
        store.put_match(&pending("m1", "c", "a", 100)).unwrap();
        store.put_match(&pending("m3", "b", "c", 300)).unwrap();
        store.put_match(&pending("m4", "a", "d", 100)).unwrap();

        let ids: Vec<String> = store
            .list_matches("a")
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        // m1 and m4 share a timestamp; insertion order breaks the tie
        assert_eq!(ids, vec!["m1", "m4", "m2"]);
    }

    #[test]
    fn test_update_match_status_unknown_id() {
        let store = LocalStore::in_memory();
        let err = store
            .update_match_status("missing", MatchStatus::Accepted)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_match_status_persists() {
        let store = LocalStore::in_memory();
        store.put_match(&pending("m1", "a", "b", 1)).unwrap();

        let updated = store
            .update_match_status("m1", MatchStatus::Declined)
            .unwrap();
        assert_eq!(updated.status, MatchStatus::Declined);
        assert_eq!(
            store.get_match("m1").unwrap().map(|m| m.status),
            Some(MatchStatus::Declined)
        );
    }

    #[test]
    fn test_modify_match_failure_writes_nothing() {
        let store = LocalStore::in_memory();
        store.put_match(&pending("m1", "a", "b", 1)).unwrap();

        let err = store
            .modify_match("m1", |m| {
                m.status = MatchStatus::Accepted;
                Err(AppError::InvalidState("nope".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(
            store.get_match("m1").unwrap().map(|m| m.status),
            Some(MatchStatus::Pending)
        );
    }

    #[test]
    fn test_find_or_insert_user_by_email_creates_once() {
        let store = LocalStore::in_memory();

        let (first, created) = store
            .find_or_insert_user_by_email("ana@example.com", || Ok(user("ana")))
            .unwrap();
        assert!(created);

        let (again, created) = store
            .find_or_insert_user_by_email(" ANA@example.com ", || Ok(user("other")))
            .unwrap();
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_first_logins_share_one_account() {
        let store = LocalStore::in_memory();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .find_or_insert_user_by_email("ana@example.com", || {
                            Ok(User::new_signup(format!("u{}", i), "ana@example.com", None))
                        })
                        .unwrap()
                        .0
                        .id
                })
            })
            .collect();

        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_file_write_keeps_match_pending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitbuddy.json");
        let store = LocalStore::open_file(&path).unwrap();
        store.put_match(&pending("m1", "a", "b", 1)).unwrap();

        // Block the temporary file so the next write fails
        std::fs::create_dir(path.with_extension("tmp")).unwrap();

        let err = store
            .update_match_status("m1", MatchStatus::Accepted)
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(
            store.get_match("m1").unwrap().map(|m| m.status),
            Some(MatchStatus::Pending)
        );
    }

    #[test]
    fn test_insert_match_unless_reports_conflict() {
        let store = LocalStore::in_memory();
        store.put_match(&pending("m1", "a", "b", 1)).unwrap();

        let conflict = store
            .insert_match_unless(&pending("m2", "b", "a", 2), |m| m.connects("a", "b"))
            .unwrap();
        assert_eq!(conflict.map(|m| m.id), Some("m1".to_string()));
        assert_eq!(store.list_matches("a").unwrap().len(), 1);
    }

    #[test]
    fn test_clear_all_erases_everything() {
        let store = LocalStore::in_memory();
        let u = user("ana");
        store.put_user(&u).unwrap();
        store.set_session(&u).unwrap();
        store.put_match(&pending("m1", "ana", "b", 1)).unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.get_session_user().unwrap(), None);
        assert!(store.list_users().unwrap().is_empty());
        assert!(store.list_matches("ana").unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitbuddy.json");

        {
            let store = LocalStore::open_file(&path).unwrap();
            let u = user("ana");
            store.put_user(&u).unwrap();
            store.set_session(&u).unwrap();
            store.put_match(&pending("m1", "ana", "b", 1)).unwrap();
        }

        let store = LocalStore::open_file(&path).unwrap();
        assert_eq!(store.get_session_user().unwrap().map(|u| u.id), Some("ana".to_string()));
        assert_eq!(store.list_matches("b").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_value_is_storage_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(keys::USERS, "[{]".to_string()).unwrap();
        let store = LocalStore::new(backend);

        let err = store.list_users().unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
