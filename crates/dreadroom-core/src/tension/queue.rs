//! Cooperative timer queue.
//!
//! Deadlines are session milliseconds. Due wakeups come out one at a time
//! in deadline order, ties in scheduling order, so at most one callback
//! runs at a time and a cancelled handle can never fire.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a scheduled callback should do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Tick,
    /// Continuation of the ambience loop chain started under `generation`.
    AmbienceLoop { generation: u64 },
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_seq: u64,
    pending: BTreeMap<(u64, u64), Wakeup>,
    deadlines: HashMap<TimerId, u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, at_ms: u64, wakeup: Wakeup) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((at_ms, seq), wakeup);
        let id = TimerId(seq);
        self.deadlines.insert(id, at_ms);
        id
    }

    /// Returns `false` when the handle already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(at_ms) => self.pending.remove(&(at_ms, id.0)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest wakeup due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Wakeup)> {
        let (&(at_ms, seq), _) = self.pending.first_key_value()?;
        if at_ms > now_ms {
            return None;
        }
        let wakeup = self.pending.remove(&(at_ms, seq))?;
        self.deadlines.remove(&TimerId(seq));
        Some((at_ms, wakeup))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.first_key_value().map(|(&(at_ms, _), _)| at_ms)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
