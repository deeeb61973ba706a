//! Output contracts from the engine.
//!
//! Outputs carry the actions dispatched this tick plus the structured
//! diagnostic records destined for an external sink. Hosts read them after
//! each `frame`/`idle_tick` call; the engine does not persist them.

use serde::{Deserialize, Serialize};

use mascot_api_core::DiagnosticRecord;

use crate::config::TweenPreset;
use crate::state::ModelId;

/// Discrete semantic signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EngineEvent {
    MotionStarted {
        model: ModelId,
        group: String,
        index: Option<u32>,
    },
    ExpressionApplied {
        model: ModelId,
        name: String,
    },
    TweenStarted {
        model: ModelId,
        preset: TweenPreset,
        reason: String,
    },
    TweenFinished {
        model: ModelId,
    },
    ComboFired {
        model: ModelId,
        rule_id: String,
    },
    IdleFired {
        model: ModelId,
    },
    DispatchFailed {
        model: ModelId,
        reason: String,
    },
    /// Freshest pointer sample of the frame; position updates are idempotent.
    PointerMoved {
        model: ModelId,
        x: f64,
        y: f64,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<EngineEvent>,
    #[serde(default)]
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.diagnostics.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn push_diagnostic(&mut self, record: DiagnosticRecord) {
        self.diagnostics.push(record);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.diagnostics.is_empty()
    }
}
