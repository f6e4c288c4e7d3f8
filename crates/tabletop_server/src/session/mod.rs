//! Board sessions and their lifecycle.
//!
//! ## Locking
//!
//! The [`SessionRegistry`] map lock is held only for lookup, insert and
//! delete. Each [`Session`] then guards its own game behind an async mutex
//! that is held for the whole read-modify-write of a request. Locks are
//! always taken in that order: registry first, briefly, then session.

use crate::board_id::BoardId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;
use tabletop_rules::Variant;
use tokio::sync::{Mutex, MutexGuard};

pub mod board;
pub mod controller;
pub mod history;
pub mod registry;
pub mod sweeper;

pub use board::Board;
pub use controller::TurnController;
pub use history::{History, Snapshot};
pub use registry::SessionRegistry;
pub use sweeper::SessionSweeper;

/// Lifecycle of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Mutable part of a session, only reachable through [`Session::lock`].
#[derive(Debug)]
pub struct SessionState {
    pub board: Board,
    version: u64,
    last_updated: DateTime<Utc>,
}

impl SessionState {
    /// Records an accepted mutation.
    pub fn mark_updated(&mut self) {
        self.version += 1;
        self.last_updated = Utc::now();
    }

    /// Number of accepted mutations since the board was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

/// One board: its id, activity counters and the locked game state.
#[derive(Debug)]
pub struct Session {
    id: BoardId,
    created_at: DateTime<Utc>,
    last_active_ms: AtomicI64,
    online: AtomicU32,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(id: BoardId, variant: Variant, history_depth: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
            online: AtomicU32::new(0),
            state: Mutex::new(SessionState {
                board: Board::new(variant, history_depth),
                version: 0,
                last_updated: now,
            }),
        }
    }

    pub fn id(&self) -> &BoardId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Acquires the session's exclusive lock.
    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    /// Refreshes the activity timestamp.
    pub fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        let ms = self.last_active_ms.load(Ordering::Relaxed);
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or(self.created_at)
    }

    /// Time since the last activity, zero if `now` lies before it.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_active()).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn online(&self) -> u32 {
        self.online.load(Ordering::Relaxed)
    }

    /// Adds `delta` to the online counter, never going below zero.
    ///
    /// # Returns
    ///
    /// The counter after the adjustment.
    pub fn adjust_online(&self, delta: i32) -> u32 {
        let apply = |current: u32| current.saturating_add_signed(delta);
        let previous = self
            .online
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some(apply(c)))
            .unwrap_or_else(|c| c);
        self.touch();
        apply(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(BoardId::generate(), Variant::Line, 20)
    }

    #[test]
    fn test_online_counter_never_goes_negative() {
        let session = session();
        assert_eq!(session.adjust_online(-1), 0);
        assert_eq!(session.adjust_online(1), 1);
        assert_eq!(session.adjust_online(1), 2);
        assert_eq!(session.adjust_online(-1), 1);
        assert_eq!(session.adjust_online(-5), 0);
        assert_eq!(session.online(), 0);
    }

    #[test]
    fn test_idle_time_is_measured_from_last_activity() {
        let session = session();
        let later = session.last_active() + chrono::Duration::seconds(90);
        assert_eq!(session.idle_for(later), Duration::from_secs(90));

        let earlier = session.last_active() - chrono::Duration::seconds(5);
        assert_eq!(session.idle_for(earlier), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_version_counts_accepted_mutations() {
        let session = session();
        let mut state = session.lock().await;
        assert_eq!(state.version(), 0);
        state.mark_updated();
        state.mark_updated();
        assert_eq!(state.version(), 2);
        assert!(state.last_updated() >= session.created_at());
    }
}
