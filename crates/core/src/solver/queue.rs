//! Front queue implementations

use crate::solver::r#trait::{FrontEntry, FrontQueue};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Insertion-order worklist
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    entries: VecDeque<FrontEntry>,
}

impl FifoQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrontQueue for FifoQueue {
    fn push(&mut self, entry: FrontEntry) {
        self.entries.push_back(entry);
    }

    fn pop(&mut self) -> Option<FrontEntry> {
        self.entries.pop_front()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn revisits_reached_cells(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    entry: FrontEntry,
    seq: u64,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest time first, insertion order among equal times
        other
            .entry
            .time
            .cmp(&self.entry.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Earliest-arrival-first worklist
#[derive(Debug, Clone, Default)]
pub struct ArrivalTimeQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl ArrivalTimeQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrontQueue for ArrivalTimeQueue {
    fn push(&mut self, entry: FrontEntry) {
        self.heap.push(Scheduled {
            entry,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<FrontEntry> {
        self.heap.pop().map(|s| s.entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }

    fn revisits_reached_cells(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "arrival-time"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Hours;

    fn entry(time: f32, row: usize) -> FrontEntry {
        FrontEntry::new(Hours::new(time), row, 0)
    }

    #[test]
    fn test_fifo_preserves_insertion_order() {
        let mut queue = FifoQueue::new();
        queue.push(entry(3.0, 0));
        queue.push(entry(1.0, 1));
        queue.push(entry(2.0, 2));

        assert_eq!(queue.len(), 3);
        let rows: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert!(queue.is_empty());
        assert!(!queue.revisits_reached_cells());
    }

    #[test]
    fn test_arrival_time_pops_earliest() {
        let mut queue = ArrivalTimeQueue::new();
        queue.push(entry(3.0, 0));
        queue.push(entry(1.0, 1));
        queue.push(entry(2.0, 2));
        queue.push(entry(1.0, 3));

        let rows: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.row).collect();
        // Ties resolve in insertion order
        assert_eq!(rows, vec![1, 3, 2, 0]);
        assert!(queue.revisits_reached_cells());
    }

    #[test]
    fn test_clear() {
        let mut queue = ArrivalTimeQueue::new();
        queue.push(entry(1.0, 0));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
