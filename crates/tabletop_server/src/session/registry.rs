//! The id → session map shared by all request handlers.

use super::Session;
use crate::board_id::BoardId;
use crate::config::ServerConfig;
use crate::error::GameError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tabletop_rules::Variant;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Owns every live board of one server instance.
///
/// Created once at startup and shared with handlers and the sweeper
/// through an `Arc`.
#[derive(Debug)]
pub struct SessionRegistry {
    variant: Variant,
    history_depth: usize,
    expiry: Duration,
    sessions: RwLock<HashMap<BoardId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(variant: Variant, history_depth: usize, expiry: Duration) -> Self {
        Self {
            variant,
            history_depth,
            expiry,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.variant, config.history_depth, config.session_expiry)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether ordinary requests may create a board on first reference.
    /// Lobby boards only come into existence through an explicit join.
    pub fn auto_create(&self) -> bool {
        !self.variant.has_lobby()
    }

    /// Looks up the board named by `raw_id`, creating it when allowed.
    ///
    /// # Arguments
    ///
    /// * `raw_id` - Client-supplied id, validated before any lookup
    /// * `create_if_missing` - Create a fresh board if none exists
    ///
    /// # Returns
    ///
    /// A handle to the session with its activity timestamp refreshed.
    pub async fn resolve(&self, raw_id: &str, create_if_missing: bool) -> Result<Arc<Session>, GameError> {
        let id = BoardId::parse(raw_id)?;
        self.resolve_id(&id, create_if_missing).await
    }

    /// Same as [`SessionRegistry::resolve`] for an already validated id.
    pub async fn resolve_id(&self, id: &BoardId, create_if_missing: bool) -> Result<Arc<Session>, GameError> {
        if let Some(session) = self.sessions.read().await.get(id) {
            session.touch();
            return Ok(Arc::clone(session));
        }
        if !create_if_missing {
            return Err(GameError::BoardNotFound);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id.clone()).or_insert_with(|| {
            info!("🆕 Created {} board {}", self.variant, id);
            Arc::new(Session::new(id.clone(), self.variant, self.history_depth))
        });
        session.touch();
        Ok(Arc::clone(session))
    }

    /// Adjusts a board's online counter.
    ///
    /// # Returns
    ///
    /// The counter after the adjustment.
    pub async fn heartbeat(&self, raw_id: &str, delta: i32) -> Result<u32, GameError> {
        let session = self.resolve(raw_id, self.auto_create()).await?;
        Ok(session.adjust_online(delta))
    }

    /// Picks an id that is not currently in use.
    pub async fn fresh_id(&self) -> BoardId {
        let sessions = self.sessions.read().await;
        loop {
            let id = BoardId::generate();
            if !sessions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Removes boards that nobody is viewing and that have been idle longer
    /// than the expiry window.
    ///
    /// # Returns
    ///
    /// Number of boards removed.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now()).await
    }

    /// [`SessionRegistry::sweep`] evaluated at a given instant.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            // A handler holding a clone may be mid-request on this board.
            let in_use = Arc::strong_count(session) > 1;
            let expired = session.online() == 0 && session.idle_for(now) > self.expiry;
            if expired && !in_use {
                debug!("🧹 Removing idle board {}", id);
                false
            } else {
                true
            }
        });
        before - sessions.len()
    }

    pub async fn contains(&self, id: &BoardId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
