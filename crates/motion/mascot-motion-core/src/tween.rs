//! Deterministic procedural fallback tweens.
//!
//! Each preset is a pure function of normalized progress `t` and a strength
//! multiplier, producing a transform that equals the origin exactly at
//! `t = 0` and `t = 1`. A `TweenPlayer` drives one preset over wall-clock
//! time against a runtime target; cancellation synchronously restores the
//! origin, and at most one player is live per target.

use std::f32::consts::PI;

use mascot_api_core::{ModelRuntime, Transform2D};

use crate::config::TweenPreset;
use crate::error::EngineError;

pub const MIN_STRENGTH: f32 = 0.05;
pub const MAX_STRENGTH: f32 = 3.0;

/// Parse a preset name at the call boundary.
pub fn preset_from_name(name: &str) -> Result<TweenPreset, EngineError> {
    TweenPreset::parse(name).ok_or_else(|| EngineError::UnknownPreset {
        name: name.to_string(),
    })
}

/// Evaluate `preset` at normalized progress `t` against `origin`.
///
/// `bias` (±1) picks the randomized direction; every envelope below is zero
/// at both endpoints so the origin is returned exactly at `t <= 0` and
/// `t >= 1`.
pub fn preset_transform(
    preset: TweenPreset,
    origin: &Transform2D,
    t: f32,
    strength: f32,
    bias: f32,
) -> Transform2D {
    if t <= 0.0 || t >= 1.0 {
        return *origin;
    }
    let s = strength.clamp(MIN_STRENGTH, MAX_STRENGTH);
    let bias = if bias < 0.0 { -1.0 } else { 1.0 };
    let mut out = *origin;

    match preset {
        TweenPreset::Bounce => {
            // Vertical lift with squash/stretch and a slight tilt.
            let lift = (PI * t).sin();
            let squash = (2.0 * PI * t).sin() * 0.06 * s;
            out.position.y = origin.position.y - 18.0 * s * lift;
            out.scale.x = origin.scale.x * (1.0 - 0.5 * squash);
            out.scale.y = origin.scale.y * (1.0 + squash);
            out.rotation = origin.rotation + bias * 0.04 * s * lift;
        }
        TweenPreset::Shake => {
            // Damped horizontal oscillation with scale/rotation jitter.
            let damp = 1.0 - t;
            let osc = (2.0 * PI * 3.0 * t).sin();
            out.position.x = origin.position.x + bias * 9.0 * s * osc * damp;
            out.rotation = origin.rotation + bias * 0.02 * s * osc * damp;
            out.scale.x = origin.scale.x * (1.0 + 0.015 * s * osc * damp);
        }
        TweenPreset::Nod => {
            // Damped vertical bob with rotation oscillation.
            let damp = 1.0 - t;
            let osc = (2.0 * PI * 2.0 * t).sin();
            out.position.y = origin.position.y + 6.0 * s * osc * damp;
            out.rotation = origin.rotation + bias * 0.06 * s * osc * damp;
        }
    }
    out
}

/// Drives one preset over wall-clock time against a single target.
#[derive(Clone, Debug)]
pub struct TweenPlayer {
    preset: TweenPreset,
    strength: f32,
    bias: f32,
    origin: Transform2D,
    started_at: u64,
    duration_ms: u32,
    done: bool,
}

impl TweenPlayer {
    /// Begin a tween from the target's current transform. The caller reads
    /// the origin snapshot; the player owns restoring it.
    pub fn start(
        preset: TweenPreset,
        strength: f32,
        origin: Transform2D,
        started_at: u64,
        bias: f32,
    ) -> Self {
        Self {
            preset,
            strength: strength.clamp(MIN_STRENGTH, MAX_STRENGTH),
            bias: if bias < 0.0 { -1.0 } else { 1.0 },
            origin,
            started_at,
            duration_ms: preset.duration_ms(),
            done: false,
        }
    }

    /// Advance to `now`, writing the interpolated transform to the target.
    /// Returns true once finished; the final write is the exact origin.
    pub fn step(&mut self, model: &mut dyn ModelRuntime, now: u64) -> bool {
        if self.done {
            return true;
        }
        let elapsed = now.saturating_sub(self.started_at) as f32;
        let t = elapsed / self.duration_ms as f32;
        if t >= 1.0 {
            model.set_transform(self.origin);
            self.done = true;
            return true;
        }
        model.set_transform(preset_transform(
            self.preset,
            &self.origin,
            t,
            self.strength,
            self.bias,
        ));
        false
    }

    /// Synchronously restore the origin; never leaves the target
    /// mid-animation.
    pub fn cancel(&mut self, model: &mut dyn ModelRuntime) {
        if !self.done {
            model.set_transform(self.origin);
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn preset(&self) -> TweenPreset {
        self.preset
    }

    pub fn origin(&self) -> &Transform2D {
        &self.origin
    }
}
