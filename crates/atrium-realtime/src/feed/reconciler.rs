//! Activity feed reconciler.
//!
//! One parameterized reconciler covers both the global feed and the
//! department-scoped variant. Every refresh publishes a complete
//! snapshot; entries are never merged or patched incrementally.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use atrium_core::config::feed::FeedConfig;
use atrium_core::result::AppResult;
use atrium_entity::activity::EnrichedActivity;

use crate::store::{ActivityStore, ProfileStore};
use crate::transport::{Subscription, TransportEvent};

use super::enrich;

/// The table whose inserts trigger a refresh.
pub const ACTIVITY_TABLE: &str = "activity_log";

/// Which slice of the activity log a feed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// The agency-wide feed.
    Global,
    /// Restricted to one department's members.
    Department(String),
}

impl FeedScope {
    /// Sentinel display name for entries whose profile lookup fails.
    fn sentinel(&self) -> &'static str {
        match self {
            FeedScope::Global => "Unknown User",
            FeedScope::Department(_) => "Unknown",
        }
    }

    /// Window size for this scope.
    fn limit(&self, config: &FeedConfig) -> usize {
        match self {
            FeedScope::Global => config.global_limit,
            FeedScope::Department(_) => config.department_limit,
        }
    }
}

/// Reconciles a bounded window of recent activity with profile data.
///
/// Owns its published snapshot exclusively; consumers observe it through
/// a watch receiver and re-read on every change.
pub struct ActivityFeed {
    activities: Arc<dyn ActivityStore>,
    profiles: Arc<dyn ProfileStore>,
    scope: FeedScope,
    limit: usize,
    entries: watch::Sender<Vec<EnrichedActivity>>,
    loading: AtomicBool,
    generation: AtomicU64,
}

impl ActivityFeed {
    /// Create a feed over the given stores.
    pub fn new(
        activities: Arc<dyn ActivityStore>,
        profiles: Arc<dyn ProfileStore>,
        scope: FeedScope,
        config: &FeedConfig,
    ) -> Self {
        let limit = scope.limit(config);
        let (entries, _) = watch::channel(Vec::new());
        Self {
            activities,
            profiles,
            scope,
            limit,
            entries,
            loading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// The latest published snapshot.
    pub fn entries(&self) -> Vec<EnrichedActivity> {
        self.entries.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn watch(&self) -> watch::Receiver<Vec<EnrichedActivity>> {
        self.entries.subscribe()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Re-fetch the window and publish a new snapshot.
    ///
    /// Errors are logged and leave the previous snapshot untouched. When
    /// refreshes overlap, only the most recently requested one may
    /// publish; a slower response for an older request is discarded
    /// rather than overwriting newer data.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        match self.build_snapshot().await {
            Ok(snapshot) => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.entries.send_replace(snapshot);
                } else {
                    tracing::debug!(scope = ?self.scope, "discarding stale feed snapshot");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, scope = ?self.scope, "activity feed refresh failed");
            }
        }

        // Cleared on success and failure alike, but only by the newest
        // refresh; an older one finishing late must not report idle while
        // a newer refresh is still in flight.
        if self.generation.load(Ordering::SeqCst) == generation {
            self.loading.store(false, Ordering::SeqCst);
        }
    }

    /// Build the enriched window without publishing it.
    async fn build_snapshot(&self) -> AppResult<Vec<EnrichedActivity>> {
        let member_filter = match &self.scope {
            FeedScope::Global => None,
            FeedScope::Department(department) => {
                let members = self.profiles.ids_by_department(department).await?;
                if members.is_empty() {
                    // No members means an empty feed; skip the log query
                    // rather than issuing an unfiltered one.
                    return Ok(Vec::new());
                }
                Some(members)
            }
        };

        let entries = self
            .activities
            .recent(self.limit, member_filter.as_deref())
            .await?;

        let user_ids: Vec<Uuid> = entries
            .iter()
            .map(|e| e.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names = if user_ids.is_empty() {
            Default::default()
        } else {
            self.profiles.names_by_ids(&user_ids).await?
        };

        let now = Utc::now();
        let sentinel = self.scope.sentinel();
        Ok(entries
            .into_iter()
            .map(|entry| enrich::enrich(entry, &names, sentinel, now))
            .collect())
    }

    /// Drive the feed from a transport subscription: one eager refresh on
    /// activation, then one per matching insert notification. Returns
    /// when the subscription closes.
    pub async fn run(&self, mut subscription: Subscription) {
        self.refresh().await;

        while let Some(event) = subscription.recv().await {
            if matches!(&event, TransportEvent::Insert { table } if table == ACTIVITY_TABLE) {
                self.refresh().await;
            }
        }
        tracing::debug!(scope = ?self.scope, "feed event stream closed");
    }
}
