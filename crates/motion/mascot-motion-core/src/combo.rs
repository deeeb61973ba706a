//! Rolling-window combo sequence detection.
//!
//! A bounded FIFO of recent discrete inputs is extended on every keystroke
//! and tested against the configured rules in order. A firing rule consumes
//! the matched inputs (the buffer is cleared) so the same keystrokes cannot
//! re-trigger an overlapping rule.

use std::collections::VecDeque;

use crate::binding::identifiers_match;
use crate::config::ComboRule;

/// Buffer capacity floor; the effective capacity is at least the longest
/// configured sequence.
const MIN_BUFFER_CAP: usize = 16;

#[derive(Clone, Debug)]
pub struct ComboDetector {
    buffer: VecDeque<(String, u64)>,
    cap: usize,
}

impl Default for ComboDetector {
    fn default() -> Self {
        Self {
            buffer: VecDeque::new(),
            cap: MIN_BUFFER_CAP,
        }
    }
}

impl ComboDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sized_for(rules: &[ComboRule]) -> Self {
        let mut detector = Self::new();
        detector.resize_for(rules);
        detector
    }

    /// Grow the capacity bound to cover the longest configured sequence.
    pub fn resize_for(&mut self, rules: &[ComboRule]) {
        let longest = rules.iter().map(|rule| rule.sequence.len()).max().unwrap_or(0);
        self.cap = MIN_BUFFER_CAP.max(longest);
        while self.buffer.len() > self.cap {
            self.buffer.pop_front();
        }
    }

    /// Append an input and test every rule in config order; returns the index
    /// of the first matching rule. On a match the buffer is cleared.
    pub fn push(&mut self, identifier: &str, timestamp: u64, rules: &[ComboRule]) -> Option<usize> {
        self.buffer.push_back((identifier.to_string(), timestamp));
        while self.buffer.len() > self.cap {
            self.buffer.pop_front();
        }

        for (index, rule) in rules.iter().enumerate() {
            if self.matches(rule) {
                self.buffer.clear();
                return Some(index);
            }
        }
        None
    }

    /// Tail of the buffer, read most-recent-first, must equal the rule's
    /// sequence read most-recent-first, with the first-to-last timestamp span
    /// within `within_ms` (inclusive).
    fn matches(&self, rule: &ComboRule) -> bool {
        let length = rule.sequence.len();
        if length < 2 || self.buffer.len() < length {
            return false;
        }

        let mut recent = self.buffer.iter().rev();
        let mut newest = 0u64;
        let mut oldest = 0u64;
        for (offset, expected) in rule.sequence.iter().rev().enumerate() {
            let Some((identifier, timestamp)) = recent.next() else {
                return false;
            };
            if !identifiers_match(identifier, expected) {
                return false;
            }
            if offset == 0 {
                newest = *timestamp;
            }
            oldest = *timestamp;
        }
        newest.saturating_sub(oldest) <= rule.within_ms as u64
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
