//! Fixed-capacity message ring for per-channel history
//!
//! Each channel keeps its most recent messages in a pre-allocated circular
//! buffer. The ingestion path is the only writer; queries read through
//! `snapshot()`, which copies the whole backing sequence under the same lock
//! so a query never observes a half-applied append. Once the ring is full the
//! oldest record is silently overwritten: bounded memory wins over
//! completeness.

use tokio::sync::Mutex;

/// Default number of records retained per channel
pub const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug)]
struct RingState {
    /// Pre-allocated record slots, length fixed at capacity
    slots: Vec<String>,
    /// Index of the oldest valid record when `count > 0`
    head: usize,
    /// Number of valid records, `0 ..= capacity`
    count: usize,
}

/// Bounded ring of raw message records for one channel
///
/// Valid records occupy slots `head, head+1, ..., head+count-1` (mod
/// capacity) in chronological order. The next append lands at
/// `(head + count) mod capacity`.
#[derive(Debug)]
pub struct MessageRing {
    capacity: usize,
    state: Mutex<RingState>,
}

impl MessageRing {
    /// Create a ring with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a ring with the given capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");

        Self {
            capacity,
            state: Mutex::new(RingState {
                slots: vec![String::new(); capacity],
                head: 0,
                count: 0,
            }),
        }
    }

    /// Get the fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one record, overwriting the oldest when full
    ///
    /// O(1); never fails. Overwritten records are not reported.
    pub async fn append(&self, record: String) {
        let mut state = self.state.lock().await;

        let slot = (state.head + state.count) % self.capacity;
        state.slots[slot] = record;

        if state.count < self.capacity {
            state.count += 1;
        } else {
            // The slot just written was the previous head
            state.head = (state.head + 1) % self.capacity;
        }
    }

    /// Take a consistent point-in-time copy of the ring
    ///
    /// O(capacity): the whole backing sequence is cloned under the lock, so
    /// the returned snapshot is unaffected by later appends.
    pub async fn snapshot(&self) -> RingSnapshot {
        let state = self.state.lock().await;

        RingSnapshot {
            slots: state.slots.clone(),
            head: state.head,
            count: state.count,
        }
    }
}

impl Default for MessageRing {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent copy of one ring's contents
#[derive(Debug, Clone)]
pub struct RingSnapshot {
    slots: Vec<String>,
    head: usize,
    count: usize,
}

impl RingSnapshot {
    /// Number of valid records in the snapshot
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate the valid records oldest-first
    ///
    /// The i-th oldest record lives at slot `(head + i) mod capacity`.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.count).map(move |i| self.slots[(self.head + i) % self.slots.len()].as_str())
    }
}
