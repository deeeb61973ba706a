//! Per-model engine state and identity allocation.
//!
//! State lives in a side table keyed by `ModelId`; the engine never holds a
//! reference to the rendering model itself, so it can never extend the
//! model's lifetime. Entries are created lazily on first input or
//! idle-check and torn down explicitly when the hosting view is disposed.

use serde::{Deserialize, Serialize};

use crate::adapter::ModelAdapter;
use crate::combo::ComboDetector;
use crate::config::ComboRule;
use crate::cooldown::CooldownLedger;
use crate::schedule::FrameQueue;
use crate::tween::TweenPlayer;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u32);

/// Monotonic allocator for model identities.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_model: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_model(&mut self) -> ModelId {
        let id = ModelId(self.next_model);
        self.next_model = self.next_model.wrapping_add(1);
        id
    }
}

#[derive(Debug)]
pub struct EngineState {
    pub last_input_at: u64,
    pub last_idle_at: u64,
    /// Guards re-entrant idle dispatch.
    pub idle_playing: bool,
    pub cooldowns: CooldownLedger,
    pub combo: ComboDetector,
    pub queue: FrameQueue,
    pub adapter: ModelAdapter,
    /// At most one live fallback animation per target.
    pub fallback: Option<TweenPlayer>,
    /// Set on teardown; checked before any mutation.
    pub disposed: bool,
}

impl EngineState {
    pub fn new(now: u64, rules: &[ComboRule]) -> Self {
        Self {
            last_input_at: now,
            last_idle_at: now,
            idle_playing: false,
            cooldowns: CooldownLedger::new(),
            combo: ComboDetector::sized_for(rules),
            queue: FrameQueue::new(),
            adapter: ModelAdapter::new(),
            fallback: None,
            disposed: false,
        }
    }
}
