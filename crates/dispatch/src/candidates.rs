//! Ordered failover candidates for a single dispatch

use crate::envelope::NodeAddr;
use std::collections::VecDeque;

/// Ordered queue of node addresses eligible to receive one envelope.
///
/// Taking the head removes the address permanently, so no candidate can be
/// attempted twice within the same dispatch.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    queue: VecDeque<NodeAddr>,
}

impl CandidateSet {
    /// Build the failover order for one dispatch: the preferred target
    /// first (when the caller supplied one), then the pool in its
    /// configured order. The preferred target is excluded from the pool
    /// portion, and duplicate pool entries are dropped; first occurrence
    /// wins.
    pub fn new(preferred: Option<NodeAddr>, pool: &[NodeAddr]) -> Self {
        let mut queue = VecDeque::with_capacity(pool.len() + 1);

        if let Some(preferred) = preferred {
            queue.push_back(preferred);
        }
        for addr in pool {
            if !queue.contains(addr) {
                queue.push_back(addr.clone());
            }
        }

        Self { queue }
    }

    /// Remove and return the next candidate to attempt
    pub fn take_next(&mut self) -> Option<NodeAddr> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<NodeAddr> {
        vec![
            NodeAddr::new("127.0.0.1:9090"),
            NodeAddr::new("127.0.0.1:9091"),
            NodeAddr::new("127.0.0.1:9092"),
        ]
    }

    #[test]
    fn test_pool_order_without_preferred() {
        let mut candidates = CandidateSet::new(None, &pool());
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9090");
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9091");
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9092");
        assert!(candidates.take_next().is_none());
    }

    #[test]
    fn test_preferred_comes_first_and_is_not_repeated() {
        let preferred = NodeAddr::new("127.0.0.1:9091");
        let mut candidates = CandidateSet::new(Some(preferred), &pool());

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9091");
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9090");
        assert_eq!(candidates.take_next().unwrap().as_str(), "127.0.0.1:9092");
    }

    #[test]
    fn test_preferred_outside_pool_is_prepended() {
        let preferred = NodeAddr::new("10.0.0.5:9000");
        let candidates = CandidateSet::new(Some(preferred.clone()), &pool());
        assert_eq!(candidates.len(), 4);

        let mut candidates = candidates;
        assert_eq!(candidates.take_next().unwrap(), preferred);
    }

    #[test]
    fn test_duplicate_pool_entries_dropped() {
        let pool = vec![
            NodeAddr::new("127.0.0.1:9090"),
            NodeAddr::new("127.0.0.1:9090"),
            NodeAddr::new("127.0.0.1:9091"),
        ];
        let candidates = CandidateSet::new(None, &pool);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_queue_strictly_shrinks() {
        let mut candidates = CandidateSet::new(None, &pool());
        let mut seen = Vec::new();
        while let Some(addr) = candidates.take_next() {
            assert!(!seen.contains(&addr));
            seen.push(addr);
        }
        assert_eq!(seen.len(), 3);
        assert!(candidates.is_empty());
    }
}
