//! Per-frame input coalescing.
//!
//! Discrete events queue in arrival order and are flushed once per rendering
//! frame; the queue is bounded with a drop-oldest policy since a backlog of
//! stale reactions is not useful. Pointer samples are never queued: position
//! updates are idempotent, so only the freshest sample per frame survives.

use std::collections::VecDeque;

pub const DISCRETE_QUEUE_CAP: usize = 64;

/// A key or button press, identifier already normalized for lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteInput {
    pub identifier: String,
    pub timestamp: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: u64,
}

#[derive(Debug, Default)]
pub struct FrameQueue {
    discrete: VecDeque<DiscreteInput>,
    pointer: Option<PointerSample>,
    events_seen: u64,
    dropped: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_discrete(&mut self, input: DiscreteInput) {
        self.events_seen += 1;
        if self.discrete.len() == DISCRETE_QUEUE_CAP {
            self.discrete.pop_front();
            self.dropped += 1;
        }
        self.discrete.push_back(input);
    }

    /// Latest sample wins; earlier samples within the frame are discarded.
    pub fn push_pointer(&mut self, sample: PointerSample) {
        self.events_seen += 1;
        self.pointer = Some(sample);
    }

    /// Count an event that is observed but not dispatched (e.g. releases).
    pub fn note_seen(&mut self) {
        self.events_seen += 1;
    }

    /// Take everything pending for this frame, in arrival order.
    pub fn drain(&mut self) -> (Vec<DiscreteInput>, Option<PointerSample>) {
        (self.discrete.drain(..).collect(), self.pointer.take())
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn pending(&self) -> usize {
        self.discrete.len()
    }

    pub fn clear(&mut self) {
        self.discrete.clear();
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(identifier: &str, timestamp: u64) -> DiscreteInput {
        DiscreteInput {
            identifier: identifier.to_string(),
            timestamp,
        }
    }

    /// it should drop the oldest discrete events under an event storm
    #[test]
    fn drop_oldest_under_storm() {
        let mut queue = FrameQueue::new();
        for i in 0..(DISCRETE_QUEUE_CAP as u64 + 8) {
            queue.push_discrete(key("KeyA", i));
        }
        assert_eq!(queue.pending(), DISCRETE_QUEUE_CAP);
        assert_eq!(queue.dropped(), 8);
        let (drained, _) = queue.drain();
        assert_eq!(drained.first().unwrap().timestamp, 8);
    }

    /// it should coalesce pointer samples down to the latest one
    #[test]
    fn pointer_coalesced_to_latest() {
        let mut queue = FrameQueue::new();
        queue.push_pointer(PointerSample { x: 1.0, y: 1.0, timestamp: 1 });
        queue.push_pointer(PointerSample { x: 5.0, y: 9.0, timestamp: 2 });
        let (_, pointer) = queue.drain();
        assert_eq!(pointer.unwrap().x, 5.0);
        let (_, pointer) = queue.drain();
        assert!(pointer.is_none());
    }

    /// it should preserve arrival order across a drain
    #[test]
    fn arrival_order_preserved() {
        let mut queue = FrameQueue::new();
        queue.push_discrete(key("KeyA", 1));
        queue.push_discrete(key("KeyB", 2));
        let (drained, _) = queue.drain();
        let ids: Vec<_> = drained.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["KeyA", "KeyB"]);
    }
}
