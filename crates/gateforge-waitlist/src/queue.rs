//! Queue storage: the two ordered lists of pending login requests.
//!
//! The waitlist keeps premium candidates in a *priority* queue and
//! everyone else in a *standard* queue. A candidate's **slot** is their
//! 1-based rank counting from the front of the priority queue straight
//! through the end of the standard queue — priority entries always
//! outrank standard ones, no matter who arrived first.

use std::collections::VecDeque;

use gateforge_protocol::PlayerId;

// ---------------------------------------------------------------------------
// WaitEntry
// ---------------------------------------------------------------------------

/// One pending login request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEntry {
    /// Absolute deadline (clock milliseconds) after which this entry is
    /// expired and reclaimable.
    ///
    /// Always set to "now + per-slot retry delay" at creation or refresh;
    /// never decreased except by expiry.
    pub deadline_ms: u64,

    /// The player this entry belongs to.
    pub player_id: PlayerId,
}

// ---------------------------------------------------------------------------
// QueueId / QueuePosition
// ---------------------------------------------------------------------------

/// Which of the two queues an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueId {
    /// Premium candidates. Always ranked ahead of `Standard`.
    Priority,
    /// Everyone else.
    Standard,
}

/// Where a player's entry was found.
///
/// A discriminated handle — queue identifier plus index — instead of a
/// live reference, so the caller can erase or refresh the entry without
/// holding a borrow across the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePosition {
    /// The queue the entry lives in.
    pub queue: QueueId,
    /// The entry's index within that queue.
    pub index: usize,
    /// The entry's 1-based rank across both queues combined.
    pub slot: usize,
}

// ---------------------------------------------------------------------------
// WaitQueues
// ---------------------------------------------------------------------------

/// The two ordered queues, plus the operations the manager needs.
///
/// Insertion order within each queue is arrival order. Every operation
/// here preserves the relative order of surviving entries — rank
/// stability is what makes the retry delays honest.
#[derive(Debug, Default)]
pub struct WaitQueues {
    priority: VecDeque<WaitEntry>,
    standard: VecDeque<WaitEntry>,
}

impl WaitQueues {
    /// Creates two empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry whose deadline has passed, from both queues.
    ///
    /// An expired entry means the candidate never retried inside their
    /// allotted window; their slot is reclaimed and everyone behind them
    /// moves up. Returns how many entries were dropped.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.len();
        // `retain` keeps entries where the closure returns `true`, in
        // place and in order.
        self.priority.retain(|entry| entry.deadline_ms > now_ms);
        self.standard.retain(|entry| entry.deadline_ms > now_ms);
        before - self.len()
    }

    /// Finds a player's entry, scanning the priority queue first.
    ///
    /// The returned slot is the combined 1-based rank, so a standard
    /// entry's slot includes every priority entry ahead of it.
    pub fn find(&self, player_id: PlayerId) -> Option<QueuePosition> {
        if let Some(index) =
            self.priority.iter().position(|e| e.player_id == player_id)
        {
            return Some(QueuePosition {
                queue: QueueId::Priority,
                index,
                slot: index + 1,
            });
        }

        if let Some(index) =
            self.standard.iter().position(|e| e.player_id == player_id)
        {
            return Some(QueuePosition {
                queue: QueueId::Standard,
                index,
                slot: self.priority.len() + index + 1,
            });
        }

        None
    }

    /// The combined slot a new entry would get if appended to `queue`.
    ///
    /// A new priority entry lands behind the existing priority entries
    /// but ahead of the entire standard queue; a new standard entry lands
    /// behind everything.
    pub fn next_slot(&self, queue: QueueId) -> usize {
        match queue {
            QueueId::Priority => self.priority.len() + 1,
            QueueId::Standard => self.priority.len() + self.standard.len() + 1,
        }
    }

    /// Appends an entry to the back of the given queue.
    pub fn push(&mut self, queue: QueueId, entry: WaitEntry) {
        match queue {
            QueueId::Priority => self.priority.push_back(entry),
            QueueId::Standard => self.standard.push_back(entry),
        }
    }

    /// Removes the entry at a previously found position.
    ///
    /// Relative order of the remaining entries is preserved. Returns
    /// `None` if the index is stale (out of bounds).
    pub fn remove(&mut self, pos: QueuePosition) -> Option<WaitEntry> {
        match pos.queue {
            QueueId::Priority => self.priority.remove(pos.index),
            QueueId::Standard => self.standard.remove(pos.index),
        }
    }

    /// Replaces the deadline of the entry at a previously found position.
    pub fn refresh(&mut self, pos: QueuePosition, deadline_ms: u64) {
        let entry = match pos.queue {
            QueueId::Priority => self.priority.get_mut(pos.index),
            QueueId::Standard => self.standard.get_mut(pos.index),
        };
        if let Some(entry) = entry {
            entry.deadline_ms = deadline_ms;
        }
    }

    /// The stored deadline for a player's entry, if they are queued.
    pub fn deadline_of(&self, player_id: PlayerId) -> Option<u64> {
        let pos = self.find(player_id)?;
        let entry = match pos.queue {
            QueueId::Priority => self.priority.get(pos.index),
            QueueId::Standard => self.standard.get(pos.index),
        };
        entry.map(|e| e.deadline_ms)
    }

    /// Total entries across both queues.
    pub fn len(&self) -> usize {
        self.priority.len() + self.standard.len()
    }

    /// Returns `true` if both queues are empty.
    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.standard.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
