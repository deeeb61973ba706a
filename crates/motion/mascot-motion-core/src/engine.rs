//! Engine facade: data ownership and the public per-frame API.
//!
//! One `MotionEngine` serves any number of live models. Hosts enqueue raw
//! input events as they arrive, then drive `frame()` once per rendering
//! frame and `idle_tick()` on a periodic timer (1000 ms recommended). The
//! engine owns only per-model state; the rendering model itself is passed
//! in by the host for the duration of each call.
//!
//! All engine logic runs on the thread that drives rendering frames.
//! Handlers run to completion between calls, so ordering is established by
//! the frame/timer call sequence rather than by locks.

use hashbrown::HashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mascot_api_core::{DiagnosticRecord, ModelRuntime};

use crate::binding;
use crate::config::{InputAction, MotionConfig, TweenPreset};
use crate::cooldown::{combo_identity, idle_identity, key_identity};
use crate::diag::{DiagnosticsHub, DiagnosticsSnapshot, InputHealth};
use crate::error::EngineError;
use crate::events::InputEvent;
use crate::idle;
use crate::outputs::{EngineEvent, Outputs};
use crate::schedule::{DiscreteInput, PointerSample};
use crate::state::{EngineState, IdAllocator, ModelId};
use crate::tween::TweenPlayer;

/// Preset played when a runtime action cannot be confirmed to have started.
const FALLBACK_PRESET: TweenPreset = TweenPreset::Bounce;
const FALLBACK_STRENGTH: f32 = 1.0;

/// Grace period before a silent input stream is reported unhealthy.
pub const INPUT_HEALTH_GRACE_MS: u64 = 3_000;

pub struct MotionEngine {
    cfg: MotionConfig,
    ids: IdAllocator,
    /// Registration timestamps; state itself is created lazily.
    registered: HashMap<ModelId, u64>,
    states: HashMap<ModelId, EngineState>,
    rng: SmallRng,
    diag: DiagnosticsHub,

    // Per-tick outputs
    outputs: Outputs,
}

impl MotionEngine {
    pub fn new(cfg: MotionConfig) -> Self {
        Self::with_rng(cfg, SmallRng::from_entropy())
    }

    /// Deterministic engine for tests and replay: idle selection and tween
    /// direction depend only on the seed and call sequence.
    pub fn with_seed(cfg: MotionConfig, seed: u64) -> Self {
        Self::with_rng(cfg, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: MotionConfig, rng: SmallRng) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            registered: HashMap::new(),
            states: HashMap::new(),
            rng,
            diag: DiagnosticsHub::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    /// Swap in a new validated config; combo buffers are re-sized to cover
    /// the new rules.
    pub fn set_config(&mut self, cfg: MotionConfig) {
        self.cfg = cfg;
        for state in self.states.values_mut() {
            state.combo.resize_for(&self.cfg.combo_rules);
        }
    }

    pub fn register_model(&mut self, now: u64) -> ModelId {
        let id = self.ids.alloc_model();
        self.registered.insert(id, now);
        tracing::debug!(target: "mascot::engine", ?id, "model registered");
        id
    }

    /// Enqueue a raw input event. Discrete events queue in arrival order
    /// (bounded, drop-oldest); pointer samples coalesce to the latest.
    pub fn push_event(&mut self, model: ModelId, event: InputEvent) {
        if !self.registered.contains_key(&model) {
            tracing::debug!(target: "mascot::engine", ?model, "event for unregistered model dropped");
            return;
        }
        self.diag.record_input(event.clone());

        let state = self
            .states
            .entry(model)
            .or_insert_with(|| EngineState::new(event.timestamp(), &self.cfg.combo_rules));
        if state.disposed {
            return;
        }

        match event {
            InputEvent::KeyPress {
                key_code,
                timestamp,
            } => {
                state.queue.push_discrete(DiscreteInput {
                    identifier: key_code,
                    timestamp,
                });
            }
            InputEvent::ButtonPress { button, timestamp } => {
                match binding::normalize_button(&button) {
                    Some(identifier) => state.queue.push_discrete(DiscreteInput {
                        identifier: identifier.to_string(),
                        timestamp,
                    }),
                    None => {
                        state.queue.note_seen();
                        tracing::debug!(target: "mascot::engine", %button, "unrecognized button label");
                    }
                }
            }
            InputEvent::MouseMove { x, y, timestamp } => {
                state.queue.push_pointer(PointerSample { x, y, timestamp });
            }
            InputEvent::KeyRelease { .. } | InputEvent::ButtonRelease { .. } => {
                state.queue.note_seen();
            }
        }
    }

    /// Flush pending inputs against the model and advance the active
    /// fallback animation. Called once per rendering frame.
    pub fn frame(&mut self, model: ModelId, runtime: &mut dyn ModelRuntime, now: u64) -> &Outputs {
        self.outputs.clear();
        let Some(mut state) = self.states.remove(&model) else {
            return &self.outputs;
        };
        if state.disposed {
            self.states.insert(model, state);
            return &self.outputs;
        }

        let (discrete, pointer) = state.queue.drain();
        for input in discrete {
            state.last_input_at = state.last_input_at.max(input.timestamp);
            self.handle_discrete(model, &mut state, runtime, &input, now);
        }

        if let Some(sample) = pointer {
            self.outputs.push_event(EngineEvent::PointerMoved {
                model,
                x: sample.x,
                y: sample.y,
            });
        }

        let finished = state
            .fallback
            .as_mut()
            .map(|tween| tween.step(runtime, now))
            .unwrap_or(false);
        if finished {
            state.fallback = None;
            self.outputs.push_event(EngineEvent::TweenFinished { model });
        }

        self.states.insert(model, state);
        &self.outputs
    }

    fn handle_discrete(
        &mut self,
        model: ModelId,
        state: &mut EngineState,
        runtime: &mut dyn ModelRuntime,
        input: &DiscreteInput,
        now: u64,
    ) {
        // Combos extend on every keystroke; a firing rule consumes the input.
        let fired = state
            .combo
            .push(&input.identifier, input.timestamp, &self.cfg.combo_rules);
        if let Some(index) = fired {
            let rule = &self.cfg.combo_rules[index];
            let rule_id = rule.id.clone();
            let action = rule.action.clone();
            let cooldown = rule.cooldown_ms.or(rule.action.cooldown_ms());
            if state.cooldowns.allow(&combo_identity(&rule_id), cooldown, now) {
                self.outputs
                    .push_event(EngineEvent::ComboFired { model, rule_id });
                self.dispatch_action(model, state, runtime, action, now);
            }
            return;
        }

        let resolved: Result<Option<(String, InputAction)>, EngineError> =
            binding::resolve(&self.cfg.key_map, &input.identifier)
                .map(|entry| entry.map(|(key, action)| (key.to_string(), action.clone())));
        match resolved {
            Ok(Some((_, action))) if action.is_combo() => {
                // Marker only; the detector decides when the combo fires.
            }
            Ok(Some((key, action))) => {
                let identity = key_identity(&key);
                if state.cooldowns.allow(&identity, action.cooldown_ms(), now) {
                    self.dispatch_action(model, state, runtime, action, now);
                }
            }
            Ok(None) => {
                // The character must still visibly react to unmapped input.
                let reason = format!("no binding for input '{}'", input.identifier);
                self.start_fallback(model, state, runtime, reason, now);
            }
            Err(error) => {
                self.outputs.push_event(EngineEvent::DispatchFailed {
                    model,
                    reason: error.to_string(),
                });
            }
        }
    }

    /// Periodic inactivity check; fires at most one idle action per tick.
    pub fn idle_tick(
        &mut self,
        model: ModelId,
        runtime: &mut dyn ModelRuntime,
        now: u64,
    ) -> &Outputs {
        self.outputs.clear();
        if !self.registered.contains_key(&model) {
            return &self.outputs;
        }
        let mut state = self
            .states
            .remove(&model)
            .unwrap_or_else(|| EngineState::new(now, &self.cfg.combo_rules));
        if state.disposed || state.idle_playing {
            self.states.insert(model, state);
            return &self.outputs;
        }

        if idle::idle_due(&self.cfg.idle, state.last_input_at, state.last_idle_at, now) {
            let chosen = idle::choose(&mut self.rng, &self.cfg.idle.actions)
                .map(|(index, entry)| (index, entry.action.clone()));
            if let Some((index, action)) = chosen {
                if state
                    .cooldowns
                    .allow(&idle_identity(index), action.cooldown_ms(), now)
                {
                    // Recorded before the action resolves so a slow or
                    // failing action cannot cause rapid re-fire.
                    state.last_idle_at = now;
                    state.idle_playing = true;
                    self.outputs.push_event(EngineEvent::IdleFired { model });
                    self.dispatch_action(model, &mut state, runtime, action, now);
                    state.idle_playing = false;
                }
            }
        }

        self.states.insert(model, state);
        &self.outputs
    }

    /// Tear down a model's state: pending inputs discarded, fallback
    /// cancelled with the transform restored, ledger dropped.
    pub fn dispose_model(&mut self, model: ModelId, runtime: Option<&mut dyn ModelRuntime>) {
        self.registered.remove(&model);
        if let Some(mut state) = self.states.remove(&model) {
            state.disposed = true;
            if let (Some(mut tween), Some(runtime)) = (state.fallback.take(), runtime) {
                tween.cancel(runtime);
            }
            tracing::debug!(target: "mascot::engine", ?model, "model disposed");
        }
    }

    /// Best-effort motion group introspection for a registered model.
    pub fn list_motions(
        &mut self,
        model: ModelId,
        runtime: &dyn ModelRuntime,
        now: u64,
    ) -> Vec<String> {
        if !self.registered.contains_key(&model) {
            return Vec::new();
        }
        let state = self
            .states
            .entry(model)
            .or_insert_with(|| EngineState::new(now, &self.cfg.combo_rules));
        let names = state.adapter.list_motions(runtime, now);
        let failure = state.adapter.last_failure().cloned();
        if let Some(record) = failure {
            self.diag.record(record);
        }
        names
    }

    /// Best-effort expression introspection for a registered model.
    pub fn list_expressions(
        &mut self,
        model: ModelId,
        runtime: &dyn ModelRuntime,
        now: u64,
    ) -> Vec<String> {
        if !self.registered.contains_key(&model) {
            return Vec::new();
        }
        let state = self
            .states
            .entry(model)
            .or_insert_with(|| EngineState::new(now, &self.cfg.combo_rules));
        let names = state.adapter.list_expressions(runtime, now);
        let failure = state.adapter.last_failure().cloned();
        if let Some(record) = failure {
            self.diag.record(record);
        }
        names
    }

    /// Most recent capability failure recorded for a model, if any.
    pub fn last_adapter_failure(&self, model: ModelId) -> Option<&DiagnosticRecord> {
        self.states
            .get(&model)
            .and_then(|state| state.adapter.last_failure())
    }

    /// Liveness verdict over the consumed input stream.
    pub fn input_health(&self, model: ModelId, now: u64) -> InputHealth {
        let Some(registered_at) = self.registered.get(&model) else {
            return InputHealth {
                ok: false,
                reason: Some("model_not_registered".to_string()),
            };
        };
        let seen = self
            .states
            .get(&model)
            .map(|state| state.queue.events_seen())
            .unwrap_or(0);
        if seen == 0 && now.saturating_sub(*registered_at) >= INPUT_HEALTH_GRACE_MS {
            return InputHealth {
                ok: false,
                reason: Some("no_events_detected".to_string()),
            };
        }
        InputHealth {
            ok: true,
            reason: None,
        }
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diag.snapshot()
    }

    pub fn set_metrics(&mut self, fps: Option<f64>, model_load_ms: Option<f64>) {
        self.diag.set_metrics(fps, model_load_ms);
    }

    fn dispatch_action(
        &mut self,
        model: ModelId,
        state: &mut EngineState,
        runtime: &mut dyn ModelRuntime,
        action: InputAction,
        now: u64,
    ) {
        match action {
            InputAction::Motion {
                group,
                index,
                priority,
                ..
            } => {
                if state
                    .adapter
                    .try_start_motion(runtime, &group, index, priority, now)
                {
                    self.outputs.push_event(EngineEvent::MotionStarted {
                        model,
                        group,
                        index,
                    });
                } else {
                    self.forward_adapter_failure(state);
                    let reason = format!("motion group '{group}' failed to start");
                    self.outputs.push_event(EngineEvent::DispatchFailed {
                        model,
                        reason: reason.clone(),
                    });
                    self.start_fallback(model, state, runtime, reason, now);
                }
            }
            InputAction::Expression { name, .. } => {
                if state.adapter.try_apply_expression(runtime, &name, now) {
                    self.outputs
                        .push_event(EngineEvent::ExpressionApplied { model, name });
                } else {
                    self.forward_adapter_failure(state);
                    let reason = format!("expression '{name}' failed to apply");
                    self.outputs.push_event(EngineEvent::DispatchFailed {
                        model,
                        reason: reason.clone(),
                    });
                    self.start_fallback(model, state, runtime, reason, now);
                }
            }
            InputAction::Tween {
                preset, strength, ..
            } => {
                // Local animation; cannot fail against the runtime.
                self.begin_tween(
                    model,
                    state,
                    runtime,
                    preset,
                    strength.unwrap_or(1.0),
                    "tween action".to_string(),
                    now,
                );
            }
            InputAction::Combo { .. } => {
                // Never terminal; combos resolve through the detector.
            }
        }
    }

    /// Trigger the fallback tween with a diagnostic record for the sink.
    fn start_fallback(
        &mut self,
        model: ModelId,
        state: &mut EngineState,
        runtime: &mut dyn ModelRuntime,
        reason: String,
        now: u64,
    ) {
        let record = DiagnosticRecord::new("fallback", reason.clone(), None, now);
        self.diag.record(record.clone());
        self.outputs.push_diagnostic(record);
        self.begin_tween(
            model,
            state,
            runtime,
            FALLBACK_PRESET,
            FALLBACK_STRENGTH,
            reason,
            now,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn begin_tween(
        &mut self,
        model: ModelId,
        state: &mut EngineState,
        runtime: &mut dyn ModelRuntime,
        preset: TweenPreset,
        strength: f32,
        reason: String,
        now: u64,
    ) {
        // Cancel-and-restore before reading the origin, so a superseding
        // tween starts from the target's true transform.
        if let Some(previous) = state.fallback.as_mut() {
            previous.cancel(runtime);
        }
        let origin = runtime.transform();
        let bias = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        state.fallback = Some(TweenPlayer::start(preset, strength, origin, now, bias));
        tracing::debug!(
            target: "mascot::engine",
            preset = preset.name(),
            %reason,
            "tween started"
        );
        self.outputs.push_event(EngineEvent::TweenStarted {
            model,
            preset,
            reason,
        });
    }

    fn forward_adapter_failure(&mut self, state: &EngineState) {
        if let Some(record) = state.adapter.last_failure().cloned() {
            self.diag.record(record.clone());
            self.outputs.push_diagnostic(record);
        }
    }
}
