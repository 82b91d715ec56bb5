// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use metrics::{counter, gauge};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use taskboard_common::Id;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An established session
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: Id,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

/// Session manager mapping opaque cookie tokens to user identities
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager and spawn its cleanup task
    pub fn new(ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        let manager_clone = manager.clone();
        tokio::spawn(async move {
            manager_clone.cleanup_task().await;
        });

        manager
    }

    /// Create a new session for a user, returning the session token
    pub async fn create(&self, user_id: Id) -> String {
        let token = Uuid::new_v4().to_string();
        let now = SystemTime::now();
        let session = Session {
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!("session.created").increment(1);
        gauge!("session.active").set(sessions.len() as f64);

        token
    }

    /// Resolve a session by token. Expired sessions resolve to `None`.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if SystemTime::now() < session.expires_at {
            Some(session.clone())
        } else {
            None
        }
    }

    /// Destroy a session (logout). Destroying an unknown token is a no-op.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            counter!("session.destroyed").increment(1);
            gauge!("session.active").set(sessions.len() as f64);
        }
    }

    /// Cleanup task that runs periodically to remove expired sessions
    async fn cleanup_task(&self) {
        let cleanup_interval = Duration::from_secs(60 * 60); // 1 hour

        loop {
            tokio::time::sleep(cleanup_interval).await;

            let mut sessions = self.sessions.write().await;
            let now = SystemTime::now();
            let before_count = sessions.len();

            sessions.retain(|_, session| now < session.expires_at);

            let removed = before_count - sessions.len();
            if removed > 0 {
                counter!("session.expired").increment(removed as u64);
                gauge!("session.active").set(sessions.len() as f64);
            }
        }
    }
}
