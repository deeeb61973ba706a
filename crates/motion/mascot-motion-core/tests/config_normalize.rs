use serde_json::json;

use mascot_motion_core::config::{InputAction, MotionConfig, TweenPreset};
use mascot_motion_core::validate::{normalize, resolve_or_default};

fn sample_doc() -> serde_json::Value {
    json!({
        "version": 1,
        "keyMap": {
            "KeyA": { "type": "motion", "group": "TapBody", "priority": 3, "cooldownMs": 500 },
            "KeyB": { "type": "expression", "name": "Smile" },
            "Space": { "type": "tween", "preset": "bounce", "strength": 1.2 },
            "KeyC": { "type": "combo", "ruleId": "double-c" }
        },
        "comboRules": [
            {
                "id": "double-c",
                "sequence": ["KeyC", "KeyC"],
                "withinMs": 400,
                "action": { "type": "expression", "name": "Surprised" },
                "cooldownMs": 1000
            }
        ],
        "idle": {
            "enabled": true,
            "afterMs": 15000,
            "intervalMs": 8000,
            "actions": [
                { "action": { "type": "motion", "group": "Idle" }, "weight": 3 },
                { "action": { "type": "tween", "preset": "nod" } }
            ]
        }
    })
}

/// it should accept a well-formed document without errors
#[test]
fn wellformed_document_accepted() {
    let result = normalize(&sample_doc());
    assert!(result.ok, "errors: {:?}", result.errors);
    assert!(result.errors.is_empty());

    let config = result.value.expect("config produced");
    assert_eq!(config.version, MotionConfig::VERSION);
    assert_eq!(config.key_map.len(), 4);
    assert_eq!(config.combo_rules.len(), 1);
    assert!(config.idle.enabled);
    assert_eq!(config.idle.actions.len(), 2);
    assert_eq!(config.idle.actions[0].weight, 3.0);
    assert_eq!(config.idle.actions[1].weight, 1.0);
}

/// it should be idempotent: normalizing a normalized config is a fixpoint
#[test]
fn normalization_idempotent() {
    let first = normalize(&sample_doc());
    let config = first.value.expect("first pass produced a config");

    let reserialized = serde_json::to_value(&config).expect("config serializes");
    let second = normalize(&reserialized);
    assert!(second.ok);
    assert!(second.errors.is_empty(), "errors: {:?}", second.errors);
    assert_eq!(second.value.expect("second pass produced a config"), config);
}

/// it should keep cloned configs fully independent of the original
#[test]
fn clone_independence() {
    let original = normalize(&sample_doc()).value.unwrap();
    let mut cloned = original.clone();

    if let Some(InputAction::Motion { group, .. }) = cloned.key_map.get_mut("KeyA") {
        group.push_str("Mutated");
    }
    cloned.combo_rules[0].sequence.clear();
    cloned.idle.actions.remove(0);

    assert_eq!(original, normalize(&sample_doc()).value.unwrap());
}

/// it should drop invalid keyMap entries non-fatally and record them
#[test]
fn invalid_entries_dropped_with_errors() {
    let mut doc = sample_doc();
    doc["keyMap"]["KeyX"] = json!({ "type": "teleport" });
    doc["keyMap"]["KeyY"] = json!({ "type": "motion", "group": "" });

    let result = normalize(&doc);
    assert!(result.ok);
    assert_eq!(result.errors.len(), 2);
    let config = result.value.unwrap();
    assert!(!config.key_map.contains_key("KeyX"));
    assert!(!config.key_map.contains_key("KeyY"));
    assert_eq!(config.key_map.len(), 4);
}

/// it should fail validation when zero usable bindings remain
#[test]
fn empty_key_map_fails() {
    let doc = json!({
        "keyMap": { "KeyA": { "type": "nonsense" } },
        "idle": { "enabled": false, "afterMs": 15000, "actions": [] }
    });
    let result = normalize(&doc);
    assert!(!result.ok);
    assert!(result.value.is_none());
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("no usable entries")));
}

/// it should reject non-object roots and unsupported versions outright
#[test]
fn root_and_version_rejected() {
    assert!(!normalize(&json!([1, 2, 3])).ok);
    assert!(!normalize(&json!("keyMap")).ok);

    let mut doc = sample_doc();
    doc["version"] = json!(2);
    let result = normalize(&doc);
    assert!(!result.ok);
    assert!(result.errors.iter().any(|error| error.contains("version")));
}

/// it should drop a combo rule whose sequence has fewer than two inputs
#[test]
fn short_sequence_dropped() {
    let mut doc = sample_doc();
    doc["comboRules"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "id": "too-short",
            "sequence": ["KeyZ"],
            "withinMs": 300,
            "action": { "type": "expression", "name": "Blink" }
        }));

    let result = normalize(&doc);
    assert!(result.ok);
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("at least 2")));
    let config = result.value.unwrap();
    assert!(config.combo_rules.iter().all(|rule| rule.id != "too-short"));
}

/// it should keep the first combo rule on a duplicate id and record the second
#[test]
fn duplicate_rule_id_keeps_first() {
    let mut doc = sample_doc();
    doc["comboRules"].as_array_mut().unwrap().push(json!({
        "id": "double-c",
        "sequence": ["KeyD", "KeyD"],
        "withinMs": 999,
        "action": { "type": "expression", "name": "Other" }
    }));

    let result = normalize(&doc);
    assert!(result.ok);
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("duplicate id 'double-c'")));
    let config = result.value.unwrap();
    assert_eq!(config.combo_rules.len(), 1);
    assert_eq!(config.combo_rules[0].within_ms, 400);
}

/// it should reject unknown tween presets
#[test]
fn unknown_preset_rejected() {
    let mut doc = sample_doc();
    doc["keyMap"]["KeyW"] = json!({ "type": "tween", "preset": "wobble" });

    let result = normalize(&doc);
    assert!(result.ok);
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("unknown tween preset 'wobble'")));
    assert!(!result.value.unwrap().key_map.contains_key("KeyW"));
}

/// it should forbid combo actions inside rule actions and idle entries
#[test]
fn recursive_combo_forbidden() {
    let mut doc = sample_doc();
    doc["comboRules"].as_array_mut().unwrap().push(json!({
        "id": "recursive",
        "sequence": ["KeyA", "KeyB"],
        "withinMs": 300,
        "action": { "type": "combo", "ruleId": "double-c" }
    }));
    doc["idle"]["actions"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "action": { "type": "combo", "ruleId": "double-c" } }));

    let result = normalize(&doc);
    assert!(result.ok);
    let config = result.value.unwrap();
    assert!(config.combo_rules.iter().all(|rule| rule.id != "recursive"));
    assert_eq!(config.idle.actions.len(), 2);
    assert!(config
        .idle
        .actions
        .iter()
        .all(|entry| !entry.action.is_combo()));
}

/// it should disable idle when no usable idle entries remain
#[test]
fn idle_disabled_when_actions_unusable() {
    let mut doc = sample_doc();
    doc["idle"]["actions"] = json!([{ "action": { "type": "warp" } }]);

    let result = normalize(&doc);
    assert!(result.ok);
    let config = result.value.unwrap();
    assert!(!config.idle.enabled);
    assert!(config.idle.actions.is_empty());
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("idle disabled")));
}

/// it should clamp out-of-range numeric fields during normalization
#[test]
fn numeric_fields_clamped() {
    let mut doc = sample_doc();
    doc["keyMap"]["KeyA"]["cooldownMs"] = json!(999_999);
    doc["keyMap"]["Space"]["strength"] = json!(10.0);
    doc["idle"]["actions"][0]["weight"] = json!(0.0001);

    let result = normalize(&doc);
    assert!(result.ok);
    let config = result.value.unwrap();
    match config.key_map.get("KeyA").unwrap() {
        InputAction::Motion { cooldown_ms, .. } => assert_eq!(*cooldown_ms, Some(60_000)),
        other => panic!("unexpected action {other:?}"),
    }
    match config.key_map.get("Space").unwrap() {
        InputAction::Tween {
            preset, strength, ..
        } => {
            assert_eq!(*preset, TweenPreset::Bounce);
            assert_eq!(*strength, Some(3.0));
        }
        other => panic!("unexpected action {other:?}"),
    }
    assert_eq!(config.idle.actions[0].weight, 0.01);
}

/// it should substitute the built-in default when the document is unusable
#[test]
fn resolver_falls_back_to_default() {
    let fallback = resolve_or_default(&json!(null));
    assert_eq!(fallback, MotionConfig::builtin_default());

    let parsed = resolve_or_default(&sample_doc());
    assert!(parsed.key_map.contains_key("KeyA"));
    assert_ne!(parsed, MotionConfig::builtin_default());
}
