//! Shared test helpers: in-memory stores with call counting.
//!
//! No database or network is required; these mocks implement the same
//! seams the sqlx repositories do.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use atrium_core::error::AppError;
use atrium_core::result::AppResult;
use atrium_entity::activity::{ActivityEntry, ActivityKind};
use atrium_entity::repo::{NewTrackedCommit, NewTrackedRepository, TrackedRepository};
use atrium_realtime::store::{ActivityStore, ProfileStore};
use atrium_sync::store::SyncStore;

/// Build an activity entry that happened `secs_ago` seconds ago.
pub fn entry(user_id: Uuid, secs_ago: i64) -> ActivityEntry {
    ActivityEntry {
        id: Uuid::new_v4(),
        user_id,
        activity_type: ActivityKind::Other,
        description: "did something".to_string(),
        department: None,
        created_at: Utc::now() - chrono::Duration::seconds(secs_ago),
    }
}

/// In-memory activity log with call counting and optional per-call delay
/// or failure injection.
#[derive(Default)]
pub struct MockActivityStore {
    entries: Mutex<Vec<ActivityEntry>>,
    delay: Mutex<Option<Duration>>,
    fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockActivityStore {
    pub fn new(entries: Vec<ActivityEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Default::default()
        }
    }

    pub fn set_entries(&self, entries: Vec<ActivityEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivityStore for MockActivityStore {
    async fn recent(
        &self,
        limit: usize,
        user_filter: Option<&[Uuid]>,
    ) -> AppResult<Vec<ActivityEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("injected failure"));
        }

        let mut entries: Vec<ActivityEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| user_filter.map_or(true, |ids| ids.contains(&e.user_id)))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// In-memory profile store with call counting.
#[derive(Default)]
pub struct MockProfileStore {
    names: Mutex<HashMap<Uuid, String>>,
    departments: Mutex<HashMap<String, Vec<Uuid>>>,
    pub name_calls: AtomicUsize,
    pub department_calls: AtomicUsize,
}

impl MockProfileStore {
    pub fn with_name(self, id: Uuid, name: &str) -> Self {
        self.names.lock().unwrap().insert(id, name.to_string());
        self
    }

    pub fn with_department(self, department: &str, members: Vec<Uuid>) -> Self {
        self.departments
            .lock()
            .unwrap()
            .insert(department.to_string(), members);
        self
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn names_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        let names = self.names.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| names.get(id).map(|n| (*id, n.clone())))
            .collect())
    }

    async fn ids_by_department(&self, department: &str) -> AppResult<Vec<Uuid>> {
        self.department_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .departments
            .lock()
            .unwrap()
            .get(department)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory sync store.
#[derive(Default)]
pub struct MockSyncStore {
    repositories: Mutex<Vec<TrackedRepository>>,
    pub commit_upserts: AtomicUsize,
}

impl MockSyncStore {
    pub fn with_repository(self, user_id: Uuid, full_name: &str) -> Self {
        self.repositories.lock().unwrap().push(TrackedRepository {
            id: Uuid::new_v4(),
            user_id,
            full_name: full_name.to_string(),
            name: full_name.rsplit('/').next().unwrap_or(full_name).to_string(),
            description: None,
            default_branch: Some("main".to_string()),
            synced_at: Utc::now(),
        });
        self
    }
}

#[async_trait]
impl SyncStore for MockSyncStore {
    async fn upsert_repository(&self, repo: &NewTrackedRepository) -> AppResult<TrackedRepository> {
        let mut repositories = self.repositories.lock().unwrap();
        if let Some(existing) = repositories
            .iter_mut()
            .find(|r| r.full_name == repo.full_name && r.user_id == repo.user_id)
        {
            existing.name = repo.name.clone();
            existing.description = repo.description.clone();
            existing.synced_at = Utc::now();
            return Ok(existing.clone());
        }
        let stored = TrackedRepository {
            id: Uuid::new_v4(),
            user_id: repo.user_id,
            full_name: repo.full_name.clone(),
            name: repo.name.clone(),
            description: repo.description.clone(),
            default_branch: repo.default_branch.clone(),
            synced_at: Utc::now(),
        };
        repositories.push(stored.clone());
        Ok(stored)
    }

    async fn upsert_commit(&self, _commit: &NewTrackedCommit) -> AppResult<()> {
        self.commit_upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_repository(
        &self,
        user_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<TrackedRepository>> {
        Ok(self
            .repositories
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.full_name == full_name)
            .cloned())
    }
}
