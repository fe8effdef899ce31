//! Event bus and timer queue.
//!
//! Inputs are applied strictly in the order received, so the bus is FIFO.
//! Timers are the only thing ordered by time: earliest deadline first, ties
//! broken by scheduling order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use super::events::{Event, TimerId, Timestamp};

/// FIFO queue of pending inputs
pub struct EventBus {
    queue: VecDeque<Event>,
    seq_counter: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seq_counter: 0,
        }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: Event) {
        self.seq_counter += 1;
        self.queue.push_back(event);
    }

    /// Pop the oldest event
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Total events ever accepted
    pub fn accepted(&self) -> u64 {
        self.seq_counter
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper for priority queue ordering (earliest first)
struct PendingTimer {
    at: Timestamp,
    seq: u64,
    id: TimerId,
}

impl PartialEq for PendingTimer {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for PendingTimer {}

impl PartialOrd for PendingTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (earliest first)
        match other.at.cmp(&self.at) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Virtual timer wheel for deterministic drivers
pub struct TimerQueue {
    heap: BinaryHeap<PendingTimer>,
    cancelled: HashSet<TimerId>,
    seq_counter: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            seq_counter: 0,
        }
    }

    pub fn schedule(&mut self, id: TimerId, at: Timestamp) {
        self.seq_counter += 1;
        self.cancelled.remove(&id);
        self.heap.push(PendingTimer {
            at,
            seq: self.seq_counter,
            id,
        });
    }

    pub fn cancel(&mut self, id: TimerId) {
        if self.heap.iter().any(|t| t.id == id) {
            self.cancelled.insert(id);
        }
    }

    /// Pop the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(Timestamp, TimerId)> {
        while let Some(top) = self.heap.peek() {
            if top.at > now {
                return None;
            }
            let t = self.heap.pop()?;
            if self.cancelled.remove(&t.id) {
                continue;
            }
            return Some((t.at, t.id));
        }
        None
    }

    /// Live (not cancelled) timers
    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_is_fifo() {
        let mut bus = EventBus::new();
        bus.push(Event::pointer_leave(3000));
        bus.push(Event::pointer_leave(1000));
        bus.push(Event::pointer_leave(2000));

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.pop().unwrap().timestamp(), 3000);
        assert_eq!(bus.pop().unwrap().timestamp(), 1000);
        assert_eq!(bus.pop().unwrap().timestamp(), 2000);
        assert!(bus.is_empty());
        assert_eq!(bus.accepted(), 3);
    }

    #[test]
    fn test_timers_earliest_first() {
        let mut q = TimerQueue::new();
        q.schedule(1, 300);
        q.schedule(2, 100);
        q.schedule(3, 100);

        assert_eq!(q.pop_due(50), None);
        assert_eq!(q.pop_due(1000), Some((100, 2)));
        assert_eq!(q.pop_due(1000), Some((100, 3)));
        assert_eq!(q.pop_due(1000), Some((300, 1)));
        assert_eq!(q.pop_due(1000), None);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        q.schedule(1, 100);
        q.schedule(2, 200);
        q.cancel(1);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(500), Some((200, 2)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let mut q = TimerQueue::new();
        q.cancel(42);
        assert_eq!(q.len(), 0);
    }
}
