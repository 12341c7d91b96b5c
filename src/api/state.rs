use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use handlebars::Handlebars;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::api::routes::ui::templates;
use crate::chat::{ChatRelay, ChatSession};
use crate::core::AppConfig;

/// A session is locked for a whole interaction cycle so one user's
/// turns never overlap.
pub type SharedSession = Arc<Mutex<ChatSession>>;

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

impl SessionEntry {
    // A request still holding the session keeps it alive
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        Arc::strong_count(&self.session) == 1
            && now.saturating_duration_since(self.last_seen) >= ttl
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub relay: ChatRelay,
    pub templates: Handlebars<'static>,
    // One isolated session per browser, keyed by the session cookie
    sessions: HashMap<String, SessionEntry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let relay = ChatRelay::from_config(&config);
        Self {
            config,
            relay,
            templates: templates(),
            sessions: HashMap::new(),
        }
    }

    /// Look up a live session by id and mark it as used. Unknown and
    /// expired ids return `None`.
    pub fn session(&mut self, id: &str) -> Option<SharedSession> {
        let now = Instant::now();
        let ttl = self.config.session_ttl;
        let entry = self.sessions.get_mut(id)?;
        if entry.expired(now, ttl) {
            tracing::debug!("Session {} expired", id);
            self.sessions.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(Arc::clone(&entry.session))
    }

    /// Start a session under a new server issued id. Idle sessions are
    /// swept first so the registry only grows with active users.
    pub fn start_session(&mut self) -> (String, SharedSession) {
        let now = Instant::now();
        self.evict_idle_sessions(now);

        let id = Uuid::new_v4().to_string();
        tracing::debug!("Starting session {}", id);
        let session = Arc::new(Mutex::new(ChatSession::new(&id, self.config.variant)));
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        (id, session)
    }

    /// Drop every session idle for longer than the configured TTL.
    /// Returns how many were dropped.
    pub fn evict_idle_sessions(&mut self, now: Instant) -> usize {
        let ttl = self.config.session_ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.expired(now, ttl));
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
