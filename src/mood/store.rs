// src/mood/store.rs
// Session history storage, keyed by caller-supplied session id

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::history::{SessionMoodHistory, SessionSeed};

/// Shared handle to one session's history. Lock it for the whole turn so
/// overlapping requests for the same session are serialized.
pub type SessionHandle = Arc<Mutex<SessionMoodHistory>>;

/// Storage backend for session histories
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session for `key`, creating it from `seed` on first contact
    async fn session(&self, key: &str, seed: SessionSeed) -> SessionHandle;

    /// Get the session for `key` without creating it
    async fn peek(&self, key: &str) -> Option<SessionHandle>;

    /// Forget a session; returns whether it existed
    async fn remove(&self, key: &str) -> bool;

    /// Put `handle` back under `key` if the key has no entry (evicted or
    /// expired while a turn held it). An existing entry is left alone.
    async fn reinstate(&self, key: &str, handle: &SessionHandle);
}

/// In-process store backed by a moka cache with idle expiry
pub struct InMemorySessionStore {
    inner: Cache<String, SessionHandle>,
    idle_ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Default capacity when none is configured.
    ///
    /// Capacity eviction can drop a session whose handle a turn still holds.
    /// The turn reinstates it on commit, but a request for the same key that
    /// arrives before then gets a fresh handle and is not serialized with the
    /// in-flight turn; the later commit wins.
    pub const DEFAULT_MAX_SESSIONS: u64 = 10_000;

    /// Create a store. `idle_ttl` of `None` keeps sessions for the process lifetime.
    pub fn new(max_sessions: u64, idle_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_sessions);

        if let Some(ttl) = idle_ttl.filter(|ttl| !ttl.is_zero()) {
            builder = builder.time_to_idle(ttl);
            tracing::debug!(idle_secs = ttl.as_secs(), "Session idle expiry configured");
        }

        tracing::info!(
            max_sessions,
            idle_ttl_secs = ?idle_ttl.map(|t| t.as_secs()),
            "Session store initialized"
        );

        Self {
            inner: builder.build(),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    /// Approximate number of live sessions (flushes pending maintenance first)
    pub async fn session_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SESSIONS, None)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn session(&self, key: &str, seed: SessionSeed) -> SessionHandle {
        self.inner
            .get_with(key.to_string(), async move {
                tracing::debug!(mood = %seed.mood, level = %seed.level, "Creating session history");
                Arc::new(Mutex::new(SessionMoodHistory::new(seed)))
            })
            .await
    }

    async fn peek(&self, key: &str) -> Option<SessionHandle> {
        self.inner.get(key).await
    }

    async fn remove(&self, key: &str) -> bool {
        self.inner.remove(key).await.is_some()
    }

    async fn reinstate(&self, key: &str, handle: &SessionHandle) {
        let handle = handle.clone();
        let current = self
            .inner
            .get_with(key.to_string(), async move { handle })
            .await;
        tracing::trace!(key, "Session handle reinstated if missing");
        drop(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::stage::{EmotionStage, MoodLevel};

    fn seed(level: f64) -> SessionSeed {
        SessionSeed {
            mood: MoodLevel::new(level).displayed_stage(),
            level: MoodLevel::new(level),
        }
    }

    #[tokio::test]
    async fn test_session_created_lazily_with_seed() {
        let store = InMemorySessionStore::default();
        assert!(store.peek("alice").await.is_none());

        let handle = store.session("alice", seed(6.0)).await;
        let history = handle.lock().await;
        assert_eq!(history.last_mood, EmotionStage::Happy);
        assert_eq!(history.last_mood_level.value(), 6.0);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_seed_only_applies_on_creation() {
        let store = InMemorySessionStore::default();
        store.session("alice", seed(6.0)).await.lock().await.record(1.0);

        let handle = store.session("alice", seed(0.0)).await;
        let history = handle.lock().await;
        assert_eq!(history.last_mood_level.value(), 6.0);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::default();
        store.session("alice", seed(2.0)).await.lock().await.record(2.0);
        store.session("bob", seed(2.0)).await.lock().await.record(-2.0);

        let alice = store.peek("alice").await.unwrap();
        let bob = store.peek("bob").await.unwrap();
        assert_eq!(alice.lock().await.scores().collect::<Vec<_>>(), vec![2.0]);
        assert_eq!(bob.lock().await.scores().collect::<Vec<_>>(), vec![-2.0]);
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_same_key_shares_handle() {
        let store = InMemorySessionStore::default();
        let a = store.session("s", seed(2.0)).await;
        let b = store.session("s", seed(2.0)).await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemorySessionStore::default();
        store.session("gone", seed(2.0)).await;
        assert!(store.remove("gone").await);
        assert!(!store.remove("gone").await);
        assert!(store.peek("gone").await.is_none());
    }

    #[tokio::test]
    async fn test_reinstate_restores_dropped_handle() {
        let store = InMemorySessionStore::default();
        let held = store.session("evicted", seed(2.0)).await;
        held.lock().await.record(1.0);
        store.remove("evicted").await;

        store.reinstate("evicted", &held).await;

        let back = store.peek("evicted").await.unwrap();
        assert!(Arc::ptr_eq(&back, &held));
        assert_eq!(back.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reinstate_keeps_newer_handle() {
        let store = InMemorySessionStore::default();
        let old = store.session("s", seed(2.0)).await;
        store.remove("s").await;
        let newer = store.session("s", seed(5.0)).await;

        store.reinstate("s", &old).await;

        let current = store.peek("s").await.unwrap();
        assert!(Arc::ptr_eq(&current, &newer));
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = InMemorySessionStore::new(100, Some(Duration::from_millis(50)));
        store.session("idle", seed(2.0)).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.peek("idle").await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_expiry() {
        let store = InMemorySessionStore::new(100, Some(Duration::ZERO));
        store.session("kept", seed(2.0)).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.peek("kept").await.is_some());
    }
}
