//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory session store.

use interview_coach_core::{
    ports::{DocumentTextExtractor, TextGenerationService},
    GatewaySettings, GenerationGateway, InterviewSession, SessionSettings,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

/// How often the idle-session sweeper wakes up.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub gateway: GenerationGateway,
    pub extractor: Arc<dyn DocumentTextExtractor>,
    pub session_settings: SessionSettings,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn TextGenerationService>,
        extractor: Arc<dyn DocumentTextExtractor>,
        gateway_settings: GatewaySettings,
        session_settings: SessionSettings,
    ) -> Self {
        Self {
            gateway: GenerationGateway::new(backend, gateway_settings),
            extractor,
            session_settings,
            sessions: SessionStore::default(),
        }
    }
}

//=========================================================================================
// SessionStore (Process-Lifetime Only)
//=========================================================================================

/// A handle to one session. The mutex makes every event on a session run to
/// completion before the next one starts.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

/// Interview sessions keyed by id. Nothing survives a restart, and sessions
/// idle for longer than the configured TTL are dropped by the sweeper.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub async fn insert(&self, session: InterviewSession) -> SessionHandle {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id)
    }

    /// Drops every session idle for longer than `ttl` as of `now`, finished or
    /// abandoned alike. A session busy with an event is never dropped.
    pub async fn evict_idle(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => (now - session.last_activity())
                .to_std()
                .map_or(true, |idle| idle <= ttl),
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Periodically evicts idle sessions for the lifetime of the process.
pub fn spawn_session_sweeper(state: Arc<AppState>, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = state.sessions.evict_idle(ttl, Utc::now()).await;
            if evicted > 0 {
                info!("Evicted {} idle interview sessions.", evicted);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_coach_core::Briefing;

    fn session() -> InterviewSession {
        let briefing = Briefing::new("Backend Engineer", "Build APIs", "Rust").unwrap();
        InterviewSession::new(briefing, SessionSettings::default())
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_after_the_ttl() {
        let store = SessionStore::default();
        let stale = store.insert(session()).await;
        let stale_id = stale.lock().await.id();
        let ttl = Duration::from_secs(3600);

        assert_eq!(store.evict_idle(ttl, Utc::now()).await, 0);

        let later = Utc::now() + chrono::Duration::hours(2);
        let fresh = session();
        let fresh_id = fresh.id();
        store.insert(fresh).await;
        assert_eq!(store.evict_idle(ttl, later).await, 2);
        assert!(store.get(stale_id).await.is_none());
        assert!(store.get(fresh_id).await.is_none());
    }

    #[tokio::test]
    async fn busy_sessions_are_kept() {
        let store = SessionStore::default();
        let handle = store.insert(session()).await;
        let guard = handle.lock().await;
        let later = Utc::now() + chrono::Duration::hours(2);

        assert_eq!(store.evict_idle(Duration::from_secs(60), later).await, 0);
        assert!(store.get(guard.id()).await.is_some());
    }
}
