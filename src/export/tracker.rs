//! Membership trackers: atomic check-and-mark over reusable row keys.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::warn;

use super::TrackerPolicy;
use crate::model::{Edge, EdgeLabel, Node, NodeId};
use crate::{Error, Result};

/// Dedup key of a reusable row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackKey {
    Node(NodeId),
    Edge(NodeId, NodeId, EdgeLabel),
}

impl TrackKey {
    pub fn node(node: &Node) -> Self {
        TrackKey::Node(node.id.clone())
    }

    pub fn edge(edge: &Edge) -> Self {
        let (from, to, label) = edge.key();
        TrackKey::Edge(from, to, label)
    }
}

pub trait MembershipTracker: Send + Sync {
    /// Mark `key` present. Returns true if it was absent, i.e. the row
    /// should be written.
    fn insert_if_absent(&self, key: TrackKey) -> bool;

    /// Number of keys currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the tracker has forgotten a key and so may let a
    /// duplicate through.
    fn evicted(&self) -> bool {
        false
    }
}

/// Tracker for a configured policy.
pub fn tracker_for(policy: &TrackerPolicy) -> Result<Box<dyn MembershipTracker>> {
    Ok(match policy {
        TrackerPolicy::Exact => Box::new(ExactTracker::new()),
        TrackerPolicy::Bounded { capacity } => Box::new(BoundedTracker::new(*capacity)?),
    })
}

/// Exact set of every key seen.
#[derive(Debug, Default)]
pub struct ExactTracker {
    seen: DashSet<TrackKey>,
}

impl ExactTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MembershipTracker for ExactTracker {
    fn insert_if_absent(&self, key: TrackKey) -> bool {
        self.seen.insert(key)
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}

/// Capacity-bounded LRU cache of keys.
pub struct BoundedTracker {
    cache: Mutex<LruCache<TrackKey, ()>>,
    evictions: AtomicU64,
}

impl BoundedTracker {
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::Config("bounded tracker capacity must be positive".into()))?;
        Ok(Self { cache: Mutex::new(LruCache::new(capacity)), evictions: AtomicU64::new(0) })
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl MembershipTracker for BoundedTracker {
    fn insert_if_absent(&self, key: TrackKey) -> bool {
        let mut cache = self.cache.lock();
        if cache.get(&key).is_some() {
            return false;
        }
        if cache.len() == cache.cap().get() {
            let before = self.evictions.fetch_add(1, Ordering::Relaxed);
            if before == 0 {
                warn!(
                    capacity = cache.cap().get(),
                    "bounded dedup tracker is full; duplicate rows may now be emitted"
                );
            }
        }
        cache.put(key, ());
        true
    }

    fn len(&self) -> usize {
        self.cache.lock().len()
    }

    fn evicted(&self) -> bool {
        self.evictions() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u64) -> TrackKey {
        TrackKey::Node(NodeId::Session(n))
    }

    #[test]
    fn test_exact_tracker() {
        let tracker = ExactTracker::new();
        assert!(tracker.insert_if_absent(key(1)));
        assert!(!tracker.insert_if_absent(key(1)));
        assert!(tracker.insert_if_absent(TrackKey::Edge(
            NodeId::Session(1),
            NodeId::Session(2),
            EdgeLabel::EntityIri
        )));
        assert_eq!(tracker.len(), 2);
        assert!(!tracker.evicted());
    }

    #[test]
    fn test_bounded_tracker_forgets_after_capacity() {
        let tracker = BoundedTracker::new(2).unwrap();
        assert!(tracker.insert_if_absent(key(1)));
        assert!(tracker.insert_if_absent(key(2)));
        assert!(!tracker.evicted());
        assert!(tracker.insert_if_absent(key(3)));
        assert!(tracker.evicted());
        assert_eq!(tracker.len(), 2);
        // key 1 was least recently used
        assert!(tracker.insert_if_absent(key(1)));
    }

    #[test]
    fn test_bounded_tracker_rejects_zero_capacity() {
        assert!(matches!(BoundedTracker::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_tracker_is_race_free() {
        let tracker = ExactTracker::new();
        let admitted: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (0..100).filter(|n| tracker.insert_if_absent(key(*n))).count()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(admitted, 100);
    }
}
