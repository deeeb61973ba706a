//! Bounded diagnostics hub.
//!
//! Keeps the most recent diagnostic records, recent input events, and the
//! latest runtime metrics for retrieval by a host diagnostics surface.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use mascot_api_core::DiagnosticRecord;

use crate::events::InputEvent;

const MAX_RECORDS: usize = 50;
const MAX_INPUT_EVENTS: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSnapshot {
    pub recent_records: Vec<DiagnosticRecord>,
    pub recent_inputs: Vec<InputEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_load_ms: Option<f64>,
}

/// Input-liveness verdict for a registered model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputHealth {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Default)]
pub struct DiagnosticsHub {
    records: VecDeque<DiagnosticRecord>,
    inputs: VecDeque<InputEvent>,
    fps: Option<f64>,
    model_load_ms: Option<f64>,
}

fn push_bounded<T>(queue: &mut VecDeque<T>, max_len: usize, value: T) {
    queue.push_back(value);
    while queue.len() > max_len {
        let _ = queue.pop_front();
    }
}

impl DiagnosticsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: DiagnosticRecord) {
        push_bounded(&mut self.records, MAX_RECORDS, record);
    }

    pub fn record_input(&mut self, event: InputEvent) {
        push_bounded(&mut self.inputs, MAX_INPUT_EVENTS, event);
    }

    /// Non-finite samples are ignored; finite samples are clamped.
    pub fn set_metrics(&mut self, fps: Option<f64>, model_load_ms: Option<f64>) {
        if let Some(value) = fps {
            if value.is_finite() {
                self.fps = Some(value.clamp(0.0, 1_000.0));
            }
        }
        if let Some(value) = model_load_ms {
            if value.is_finite() {
                self.model_load_ms = Some(value.clamp(0.0, 600_000.0));
            }
        }
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            recent_records: self.records.iter().cloned().collect(),
            recent_inputs: self.inputs.iter().cloned().collect(),
            fps: self.fps,
            model_load_ms: self.model_load_ms,
        }
    }
}
