use crate::RoutingStatus;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::collections::VecDeque;

/// One completed search, as remembered by the activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEvent {
    pub timestamp: DateTime<Utc>,
    pub status: RoutingStatus,
    /// Routed identity; absent when the query fell through as a new
    /// identity.
    pub identity_id: Option<String>,
    pub precision: f32,
    pub flagged: bool,
}

/// Aggregate usage statistics over a recency window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_queries: usize,
    pub avg_precision: f32,
    /// Percentage of queries routed ambiguous or gray-zone.
    pub ambiguous_rate: f32,
    pub distinct_identities: usize,
}

/// Bounded FIFO of recent searches, owned explicitly and passed by handle
/// into the pipeline rather than accessed as ambient state.
pub struct ActivityLog {
    // Front = newest.
    events: RwLock<VecDeque<SearchEvent>>,
    capacity: usize,
}

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
            capacity: capacity.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Record a completed search, dropping the oldest event when full.
    pub fn record(&self, event: SearchEvent) {
        let mut events = self.events.write();
        if events.len() >= self.capacity {
            events.pop_back();
        }
        events.push_front(event);
    }

    /// Recent events, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<SearchEvent> {
        self.events.read().iter().cloned().collect()
    }

    /// Aggregate statistics over events no older than `window`.
    #[must_use]
    pub fn stats(&self, window: Duration) -> ActivityStats {
        let cutoff = Utc::now() - window;
        let events = self.events.read();
        let recent: Vec<&SearchEvent> =
            events.iter().filter(|e| e.timestamp >= cutoff).collect();

        let total_queries = recent.len();
        let avg_precision = if total_queries > 0 {
            recent.iter().map(|e| e.precision).sum::<f32>() / total_queries as f32
        } else {
            0.0
        };

        let ambiguous = recent
            .iter()
            .filter(|e| e.status.is_uncertain())
            .count();
        let ambiguous_rate = if total_queries > 0 {
            ambiguous as f32 / total_queries as f32 * 100.0
        } else {
            0.0
        };

        let distinct_identities = recent
            .iter()
            .filter_map(|e| e.identity_id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        ActivityStats {
            total_queries,
            avg_precision,
            ambiguous_rate,
            distinct_identities,
        }
    }
}
