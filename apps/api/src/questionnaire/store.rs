//! In-memory session registry. Each session sits behind its own mutex so
//! one user's generation call never blocks another user's requests.
//!
//! Sessions idle for longer than the configured TTL are evicted whenever a
//! new session is created; there is no background sweeper.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::questionnaire::catalog::Question;
use crate::questionnaire::session::{Phase, Session};

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    /// Starts a new session at the first question and registers it,
    /// evicting sessions that have been idle longer than the TTL.
    pub async fn create(&self, catalog: &'static [Question]) -> SharedSession {
        let session = Session::new(catalog);
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        let evicted = evict_idle(&mut sessions, self.idle_ttl);
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        sessions.insert(id, shared.clone());
        drop(sessions);

        info!("Session {id} created");
        shared
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Removes sessions last touched before `now - idle_ttl`. Sessions that are
/// locked (a request is using them) or generating are kept.
fn evict_idle(sessions: &mut HashMap<Uuid, SharedSession>, idle_ttl: Duration) -> usize {
    let cutoff = Utc::now() - idle_ttl;
    let before = sessions.len();
    sessions.retain(|_, shared| match shared.try_lock() {
        Ok(session) => session.updated_at >= cutoff || session.phase() == Phase::Generating,
        Err(_) => true,
    });
    before - sessions.len()
}
