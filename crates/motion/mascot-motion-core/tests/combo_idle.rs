use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use mascot_api_core::{ModelRuntime, Transform2D};
use mascot_motion_core::config::{
    ComboRule, IdleEntry, IdlePolicy, InputAction, MotionConfig, TweenPreset,
};
use mascot_motion_core::engine::MotionEngine;
use mascot_motion_core::events::InputEvent;
use mascot_motion_core::idle;
use mascot_motion_core::outputs::EngineEvent;

struct QuietRuntime {
    transform: Transform2D,
    expression_calls: Vec<String>,
}

impl QuietRuntime {
    fn new() -> Self {
        Self {
            transform: Transform2D::identity(),
            expression_calls: Vec::new(),
        }
    }
}

impl ModelRuntime for QuietRuntime {
    fn start_motion(
        &mut self,
        _group: &str,
        _index: Option<u32>,
        _priority: Option<u32>,
    ) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn apply_expression(&mut self, name: &str) -> anyhow::Result<bool> {
        self.expression_calls.push(name.to_string());
        Ok(true)
    }

    fn transform(&self) -> Transform2D {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
    }
}

fn combo_config() -> MotionConfig {
    let mut key_map = BTreeMap::new();
    // Combo markers: pressing these dispatches nothing directly.
    key_map.insert(
        "KeyA".to_string(),
        InputAction::Combo {
            rule_id: "strike".to_string(),
            cooldown_ms: None,
        },
    );
    key_map.insert(
        "KeyD".to_string(),
        InputAction::Combo {
            rule_id: "strike".to_string(),
            cooldown_ms: None,
        },
    );
    MotionConfig {
        version: MotionConfig::VERSION,
        key_map,
        combo_rules: vec![ComboRule {
            id: "strike".to_string(),
            sequence: vec!["KeyA".to_string(), "KeyD".to_string()],
            within_ms: 250,
            action: InputAction::Expression {
                name: "Surprised".to_string(),
                cooldown_ms: None,
            },
            cooldown_ms: Some(1_000),
        }],
        idle: IdlePolicy::disabled(),
    }
}

fn press(engine: &mut MotionEngine, model: mascot_motion_core::ModelId, code: &str, at: u64) {
    engine.push_event(
        model,
        InputEvent::KeyPress {
            key_code: code.to_string(),
            timestamp: at,
        },
    );
}

/// it should fire the rule action when the sequence lands inside withinMs
#[test]
fn combo_fires_inside_window() {
    let mut engine = MotionEngine::with_seed(combo_config(), 1);
    let mut runtime = QuietRuntime::new();
    let model = engine.register_model(0);

    press(&mut engine, model, "KeyA", 0);
    press(&mut engine, model, "KeyD", 200);
    let outputs = engine.frame(model, &mut runtime, 200);

    assert!(outputs.events.iter().any(|event| matches!(
        event,
        EngineEvent::ComboFired { rule_id, .. } if rule_id == "strike"
    )));
    assert_eq!(runtime.expression_calls, vec!["Surprised".to_string()]);
}

/// it should not fire outside the window and keep combo markers silent
#[test]
fn combo_misses_outside_window() {
    let mut engine = MotionEngine::with_seed(combo_config(), 2);
    let mut runtime = QuietRuntime::new();
    let model = engine.register_model(0);

    press(&mut engine, model, "KeyA", 0);
    press(&mut engine, model, "KeyD", 300);
    let outputs = engine.frame(model, &mut runtime, 300);

    assert!(!outputs
        .events
        .iter()
        .any(|event| matches!(event, EngineEvent::ComboFired { .. })));
    // Marker bindings dispatch nothing directly: no fallback, no expression.
    assert!(!outputs
        .events
        .iter()
        .any(|event| matches!(event, EngineEvent::TweenStarted { .. })));
    assert!(runtime.expression_calls.is_empty());

    // The retained buffer still completes a later valid window.
    press(&mut engine, model, "KeyA", 400);
    press(&mut engine, model, "KeyD", 500);
    let outputs = engine.frame(model, &mut runtime, 500);
    assert!(outputs
        .events
        .iter()
        .any(|event| matches!(event, EngineEvent::ComboFired { .. })));
}

/// it should apply the rule cooldown to repeated combo firings
#[test]
fn combo_cooldown_applies() {
    let mut engine = MotionEngine::with_seed(combo_config(), 3);
    let mut runtime = QuietRuntime::new();
    let model = engine.register_model(0);

    press(&mut engine, model, "KeyA", 0);
    press(&mut engine, model, "KeyD", 100);
    engine.frame(model, &mut runtime, 100);
    assert_eq!(runtime.expression_calls.len(), 1);

    // Within the 1000 ms rule cooldown: matched but suppressed.
    press(&mut engine, model, "KeyA", 300);
    press(&mut engine, model, "KeyD", 400);
    engine.frame(model, &mut runtime, 400);
    assert_eq!(runtime.expression_calls.len(), 1);

    press(&mut engine, model, "KeyA", 1_200);
    press(&mut engine, model, "KeyD", 1_300);
    engine.frame(model, &mut runtime, 1_300);
    assert_eq!(runtime.expression_calls.len(), 2);
}

fn idle_config() -> MotionConfig {
    let mut key_map = BTreeMap::new();
    key_map.insert(
        "KeyX".to_string(),
        InputAction::Tween {
            preset: TweenPreset::Nod,
            strength: None,
            cooldown_ms: None,
        },
    );
    MotionConfig {
        version: MotionConfig::VERSION,
        key_map,
        combo_rules: Vec::new(),
        idle: IdlePolicy {
            enabled: true,
            after_ms: 1_000,
            interval_ms: Some(500),
            actions: vec![IdleEntry {
                action: InputAction::Expression {
                    name: "Sleepy".to_string(),
                    cooldown_ms: None,
                },
                weight: 1.0,
            }],
        },
    }
}

/// it should fire idle actions only after inactivity and spacing both elapse
#[test]
fn idle_gates_on_inactivity_and_interval() {
    let mut engine = MotionEngine::with_seed(idle_config(), 4);
    let mut runtime = QuietRuntime::new();
    let model = engine.register_model(500);

    // First tick creates state; nothing is due yet.
    assert!(engine.idle_tick(model, &mut runtime, 500).events.is_empty());
    assert!(engine.idle_tick(model, &mut runtime, 1_000).events.is_empty());

    let outputs = engine.idle_tick(model, &mut runtime, 1_500);
    assert!(outputs
        .events
        .iter()
        .any(|event| matches!(event, EngineEvent::IdleFired { .. })));
    assert_eq!(runtime.expression_calls, vec!["Sleepy".to_string()]);

    // Interval not yet elapsed.
    assert!(engine.idle_tick(model, &mut runtime, 1_800).events.is_empty());
    let outputs = engine.idle_tick(model, &mut runtime, 2_000);
    assert!(outputs
        .events
        .iter()
        .any(|event| matches!(event, EngineEvent::IdleFired { .. })));

    // Fresh input resets the inactivity clock.
    press(&mut engine, model, "KeyX", 2_100);
    engine.frame(model, &mut runtime, 2_100);
    assert!(engine.idle_tick(model, &mut runtime, 2_600).events.is_empty());
    assert!(!engine.idle_tick(model, &mut runtime, 3_100).events.is_empty());
}

/// it should draw idle actions in proportion to their weights
#[test]
fn weighted_draw_distribution() {
    let entries = vec![
        IdleEntry {
            action: InputAction::Expression {
                name: "A".to_string(),
                cooldown_ms: None,
            },
            weight: 3.0,
        },
        IdleEntry {
            action: InputAction::Expression {
                name: "B".to_string(),
                cooldown_ms: None,
            },
            weight: 1.0,
        },
    ];

    let mut rng = SmallRng::seed_from_u64(42);
    let draws = 10_000;
    let mut first = 0usize;
    for _ in 0..draws {
        let (index, _) = idle::choose(&mut rng, &entries).expect("non-empty entries");
        if index == 0 {
            first += 1;
        }
    }
    let share = first as f64 / draws as f64;
    assert!(
        (share - 0.75).abs() <= 0.03,
        "weight-3 entry drawn with share {share}"
    );
}
