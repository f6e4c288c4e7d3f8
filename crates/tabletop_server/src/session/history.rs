//! Bounded undo history.
//!
//! Snapshots share the engine state through `Arc`, so pushing one never copies
//! a board: the controller swaps in a fresh state after each accepted move and
//! the old one lives on only here.

use super::GameStatus;
use crate::identity::PlayerToken;
use std::collections::VecDeque;
use std::sync::Arc;

/// Immutable pre-move state of a board together with who moved next.
#[derive(Debug)]
pub struct Snapshot<E> {
    pub engine: Arc<E>,
    pub status: GameStatus,
    pub actor: PlayerToken,
}

impl<E> Clone for Snapshot<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            status: self.status,
            actor: self.actor.clone(),
        }
    }
}

/// A LIFO stack that drops its oldest entry once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct History<E> {
    entries: VecDeque<Snapshot<E>>,
    capacity: usize,
}

impl<E> History<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot<E>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot<E>> {
        self.entries.pop_back()
    }

    /// The snapshot `pop` would return.
    pub fn last(&self) -> Option<&Snapshot<E>> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(value: u32) -> Snapshot<u32> {
        Snapshot {
            engine: Arc::new(value),
            status: GameStatus::Playing,
            actor: PlayerToken::issue(),
        }
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut history = History::new(20);
        for i in 0..25 {
            history.push(snapshot(i));
        }
        assert_eq!(history.len(), 20);

        let mut restored = Vec::new();
        while let Some(entry) = history.pop() {
            restored.push(*entry.engine);
        }
        assert_eq!(restored.first(), Some(&24));
        assert_eq!(restored.last(), Some(&5));
    }

    #[test]
    fn test_last_matches_pop() {
        let mut history = History::new(3);
        history.push(snapshot(1));
        history.push(snapshot(2));
        assert_eq!(history.last().map(|s| *s.engine), Some(2));
        assert_eq!(history.pop().map(|s| *s.engine), Some(2));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
    }
}
