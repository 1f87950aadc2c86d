//! Timed task queue
//!
//! Delayed effects are queued here and drained once per tick. Tasks are plain
//! data; whoever drains them re-checks its own state before acting, so an
//! entity torn down in the meantime simply ignores its stale tasks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<T> {
    due: f32,
    seq: u64,
    task: T,
}

/// Queue of tasks keyed by due time (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once `now >= due`
    pub fn schedule(&mut self, due: f32, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, task });
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Tasks due at the same time keep their scheduling order.
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        if !self.entries.iter().any(|e| e.due <= now) {
            return Vec::new();
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.task).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
