//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CommunityUnreadSource, CommunityUnreadSourceError, MessagingSchemaProbe,
    MessagingSchemaProbeError, NotificationPreferencesRepository,
    NotificationPreferencesRepositoryError, NotificationRepository, NotificationRepositoryError,
    PropertyUnreadRepository, PropertyUnreadRepositoryError,
};
use crate::domain::{
    LegacyLayout, Notification, NotificationId, NotificationListQuery, NotificationPreferences,
    ProfileId, UserId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Schema probe answering from a fixed table catalogue.
#[derive(Debug, Default)]
pub struct StaticSchemaProbe {
    profiles: Vec<UserId>,
    tables: HashMap<String, Vec<String>>,
}

impl StaticSchemaProbe {
    /// Register a table and its columns.
    #[must_use]
    pub fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.tables.insert(
            table.to_owned(),
            columns.iter().map(|column| (*column).to_owned()).collect(),
        );
        self
    }

    /// Register a legacy profile row for `user_id`.
    #[must_use]
    pub fn with_profile(mut self, user_id: UserId) -> Self {
        self.profiles.push(user_id);
        self
    }
}

#[async_trait]
impl MessagingSchemaProbe for StaticSchemaProbe {
    async fn has_user_profile(&self, user_id: &UserId) -> Result<bool, MessagingSchemaProbeError> {
        Ok(self.profiles.contains(user_id))
    }

    async fn table_columns(
        &self,
        table: &str,
    ) -> Result<Option<Vec<String>>, MessagingSchemaProbeError> {
        Ok(self.tables.get(table).cloned())
    }
}

/// Property repository returning canned counts.
#[derive(Debug, Default)]
pub struct StaticPropertyUnreadRepository {
    profile: Option<ProfileId>,
    legacy: Option<i64>,
    modern: Option<i64>,
}

impl StaticPropertyUnreadRepository {
    /// Resolve every user to `profile` and report `count` legacy unread.
    #[must_use]
    pub fn legacy(profile: ProfileId, count: i64) -> Self {
        Self {
            profile: Some(profile),
            legacy: Some(count),
            modern: None,
        }
    }

    /// Report `count` unread in sender/receiver conversations.
    #[must_use]
    pub fn modern(count: i64) -> Self {
        Self {
            profile: None,
            legacy: None,
            modern: Some(count),
        }
    }

    /// Fail every count query.
    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyUnreadRepository for StaticPropertyUnreadRepository {
    async fn find_profile_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<ProfileId>, PropertyUnreadRepositoryError> {
        Ok(self.profile.clone())
    }

    async fn count_legacy_unread(
        &self,
        _profile_id: &ProfileId,
        _layout: LegacyLayout,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        self.legacy
            .ok_or_else(|| PropertyUnreadRepositoryError::query("legacy tables unavailable"))
    }

    async fn count_modern_unread(
        &self,
        _user_id: &UserId,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        self.modern
            .ok_or_else(|| PropertyUnreadRepositoryError::query("modern tables unavailable"))
    }
}

/// Community source returning a canned result.
#[derive(Debug)]
pub struct StaticCommunityUnreadSource {
    name: &'static str,
    result: Result<i64, CommunityUnreadSourceError>,
}

impl StaticCommunityUnreadSource {
    /// Source that always answers `count`.
    pub fn count(name: &'static str, count: i64) -> Self {
        Self {
            name,
            result: Ok(count),
        }
    }

    /// Source that always fails.
    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            result: Err(CommunityUnreadSourceError::query("relation does not exist")),
        }
    }
}

#[async_trait]
impl CommunityUnreadSource for StaticCommunityUnreadSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn count_unread(&self, _user_id: &UserId) -> Result<i64, CommunityUnreadSourceError> {
        self.result.clone()
    }
}

/// Notification repository kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    /// Seed the repository.
    pub fn with_notifications(rows: Vec<Notification>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Copy of the stored rows.
    pub fn snapshot(&self) -> Vec<Notification> {
        lock(&self.rows).clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn list(
        &self,
        user_id: &UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut rows: Vec<Notification> = lock(&self.rows)
            .iter()
            .filter(|row| &row.user_id == user_id)
            .filter(|row| !query.unread_only() || !row.read)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect())
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        let count = lock(&self.rows)
            .iter()
            .filter(|row| &row.user_id == user_id && !row.read)
            .count();
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows
            .iter_mut()
            .find(|row| &row.id == id && &row.user_id == user_id)
        else {
            return Ok(false);
        };
        if !row.read {
            row.read = true;
            row.read_at = Some(read_at);
        }
        Ok(true)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut updated = 0_u64;
        for row in lock(&self.rows)
            .iter_mut()
            .filter(|row| &row.user_id == user_id && !row.read)
        {
            row.read = true;
            row.read_at = Some(read_at);
            updated += 1;
        }
        Ok(updated)
    }

    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        lock(&self.rows).push(notification.clone());
        Ok(())
    }
}

/// Preference repository kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotificationPreferencesRepository {
    rows: Mutex<HashMap<UserId, NotificationPreferences>>,
}

impl InMemoryNotificationPreferencesRepository {
    /// Stored row for `user_id`, if any.
    pub fn get(&self, user_id: &UserId) -> Option<NotificationPreferences> {
        lock(&self.rows).get(user_id).cloned()
    }
}

#[async_trait]
impl NotificationPreferencesRepository for InMemoryNotificationPreferencesRepository {
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, NotificationPreferencesRepositoryError> {
        Ok(self.get(user_id))
    }

    async fn insert_if_absent(
        &self,
        defaults: &NotificationPreferences,
    ) -> Result<NotificationPreferences, NotificationPreferencesRepositoryError> {
        Ok(lock(&self.rows)
            .entry(defaults.user_id.clone())
            .or_insert_with(|| defaults.clone())
            .clone())
    }

    async fn save(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<(), NotificationPreferencesRepositoryError> {
        lock(&self.rows).insert(preferences.user_id.clone(), preferences.clone());
        Ok(())
    }
}
