//! Deferred task queue
//!
//! Delayed sub-effects (combo follow-ups, wind-ups, visual cleanup) are queued
//! with an absolute fire time on the boss clock and drained at the start of
//! each update. Tasks carry no cancellation token; whoever runs them
//! re-validates the world at fire time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Scheduled<T> {
    fire_at_ms: f64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so BinaryHeap (a max-heap) yields the earliest task first;
    // equal fire times come out in scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at_ms
            .total_cmp(&self.fire_at_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Fire-time ordered queue of deferred tasks.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at_ms: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled {
            fire_at_ms,
            seq,
            task,
        });
    }

    /// Pop the earliest task whose fire time has arrived.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T> {
        if self.heap.peek()?.fire_at_ms <= now_ms {
            self.heap.pop().map(|scheduled| scheduled.task)
        } else {
            None
        }
    }

    /// Fire time of the next pending task.
    pub fn next_fire_at(&self) -> Option<f64> {
        self.heap.peek().map(|scheduled| scheduled.fire_at_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending task without running it.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Remove every pending task, earliest first, without running it.
    pub fn drain(&mut self) -> Vec<T> {
        let mut tasks = Vec::with_capacity(self.heap.len());
        while let Some(scheduled) = self.heap.pop() {
            tasks.push(scheduled.task);
        }
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_fire_time_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(300.0, "third");
        queue.schedule(100.0, "first");
        queue.schedule(200.0, "second");

        assert_eq!(queue.pop_due(1000.0), Some("first"));
        assert_eq!(queue.pop_due(1000.0), Some("second"));
        assert_eq!(queue.pop_due(1000.0), Some("third"));
        assert_eq!(queue.pop_due(1000.0), None);
    }

    #[test]
    fn test_equal_fire_times_are_fifo() {
        let mut queue = DeferredQueue::new();
        for i in 0..5 {
            queue.schedule(50.0, i);
        }
        let drained: Vec<i32> = std::iter::from_fn(|| queue.pop_due(50.0)).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut queue = DeferredQueue::new();
        queue.schedule(500.0, ());
        assert_eq!(queue.pop_due(499.9), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_fire_at(), Some(500.0));
        assert_eq!(queue.pop_due(500.0), Some(()));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empties_in_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(20.0, 'b');
        queue.schedule(10.0, 'a');
        assert_eq!(queue.drain(), vec!['a', 'b']);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1.0, ());
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pop_due(10.0), None);
    }
}
