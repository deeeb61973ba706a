//! Validation and normalization of untrusted configuration documents.
//!
//! `normalize` is total and pure: any JSON value in, a result-with-errors
//! out, no I/O, no panic. Invalid entries are dropped (and recorded), not
//! fatal; in-range clamping of numeric fields is normalization, not an
//! error. Validation fails as a whole only when the document is not an
//! object, declares an unsupported version, or yields zero usable bindings.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::config::{ComboRule, IdleEntry, IdlePolicy, InputAction, MotionConfig, TweenPreset};

/// Outcome of normalizing one untrusted document.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub ok: bool,
    pub errors: Vec<String>,
    pub value: Option<MotionConfig>,
}

impl Normalized {
    fn failed(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            errors,
            value: None,
        }
    }
}

/// Parse and normalize an arbitrary JSON value into a `MotionConfig`.
pub fn normalize(raw: &JsonValue) -> Normalized {
    let mut errors = Vec::new();

    let Some(root) = raw.as_object() else {
        return Normalized::failed(vec!["config root must be an object".to_string()]);
    };

    if let Some(version) = root.get("version") {
        if version.as_u64() != Some(MotionConfig::VERSION as u64) {
            errors.push(format!(
                "unsupported config version {version}, expected {}",
                MotionConfig::VERSION
            ));
            return Normalized::failed(errors);
        }
    }

    let key_map = parse_key_map(root.get("keyMap"), &mut errors);
    let combo_rules = parse_combo_rules(root.get("comboRules"), &mut errors);
    let idle = parse_idle(root.get("idle"), &mut errors);

    if key_map.is_empty() {
        errors.push("keyMap has no usable entries".to_string());
        return Normalized::failed(errors);
    }

    Normalized {
        ok: true,
        errors,
        value: Some(MotionConfig {
            version: MotionConfig::VERSION,
            key_map,
            combo_rules,
            idle,
        }),
    }
}

/// Convenience resolver: logs validation errors and substitutes the built-in
/// default when the document is unusable. Callers never receive a half-valid
/// config.
pub fn resolve_or_default(raw: &JsonValue) -> MotionConfig {
    let normalized = normalize(raw);
    for error in &normalized.errors {
        tracing::warn!(target: "mascot::config", "{error}");
    }
    match normalized.value {
        Some(config) if normalized.ok => config,
        _ => {
            tracing::warn!(
                target: "mascot::config",
                "config rejected, using built-in default"
            );
            MotionConfig::builtin_default()
        }
    }
}

fn parse_key_map(
    raw: Option<&JsonValue>,
    errors: &mut Vec<String>,
) -> BTreeMap<String, InputAction> {
    let mut key_map = BTreeMap::new();
    match raw {
        Some(JsonValue::Object(entries)) => {
            for (identifier, entry) in entries {
                if identifier.trim().is_empty() {
                    errors.push("keyMap: empty input identifier dropped".to_string());
                    continue;
                }
                match parse_action(entry, true) {
                    Ok(action) => {
                        key_map.insert(identifier.clone(), action);
                    }
                    Err(error) => errors.push(format!("keyMap['{identifier}']: {error}")),
                }
            }
        }
        Some(_) => errors.push("keyMap must be an object".to_string()),
        None => errors.push("keyMap is required".to_string()),
    }
    key_map
}

fn parse_combo_rules(raw: Option<&JsonValue>, errors: &mut Vec<String>) -> Vec<ComboRule> {
    let mut rules: Vec<ComboRule> = Vec::new();
    match raw {
        Some(JsonValue::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                match parse_rule(entry) {
                    Ok(rule) => {
                        if rules.iter().any(|existing| existing.id == rule.id) {
                            errors.push(format!(
                                "comboRules[{index}]: duplicate id '{}' dropped",
                                rule.id
                            ));
                        } else {
                            rules.push(rule);
                        }
                    }
                    Err(error) => errors.push(format!("comboRules[{index}]: {error}")),
                }
            }
        }
        Some(_) => errors.push("comboRules must be an array".to_string()),
        None => {}
    }
    rules
}

fn parse_rule(raw: &JsonValue) -> Result<ComboRule, String> {
    let rule = raw.as_object().ok_or("rule must be an object")?;

    let id = required_string(rule.get("id"), "id")?;

    let sequence = match rule.get("sequence") {
        Some(JsonValue::Array(entries)) => {
            let mut sequence = Vec::with_capacity(entries.len());
            for entry in entries {
                let identifier = entry
                    .as_str()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or("sequence entries must be non-empty strings")?;
                sequence.push(identifier.to_string());
            }
            sequence
        }
        _ => return Err("sequence must be an array".to_string()),
    };
    if sequence.len() < 2 {
        return Err(format!(
            "sequence must contain at least 2 inputs (got {})",
            sequence.len()
        ));
    }

    let within_ms = integer_in_range(rule.get("withinMs"), 1, 10_000, "withinMs")?
        .ok_or("withinMs is required")?;
    let action_raw = rule.get("action").ok_or("action is required")?;
    let action = parse_action(action_raw, false).map_err(|error| format!("action: {error}"))?;
    let cooldown_ms = integer_in_range(rule.get("cooldownMs"), 0, 60_000, "cooldownMs")?;

    Ok(ComboRule {
        id,
        sequence,
        within_ms,
        action,
        cooldown_ms,
    })
}

fn parse_idle(raw: Option<&JsonValue>, errors: &mut Vec<String>) -> IdlePolicy {
    let Some(idle) = raw else {
        errors.push("idle is required; idle disabled".to_string());
        return IdlePolicy::disabled();
    };
    let Some(idle) = idle.as_object() else {
        errors.push("idle must be an object; idle disabled".to_string());
        return IdlePolicy::disabled();
    };

    let mut enabled = idle
        .get("enabled")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let after_ms = match integer_in_range(idle.get("afterMs"), 500, 600_000, "afterMs") {
        Ok(Some(value)) => value,
        Ok(None) => {
            errors.push("idle.afterMs is required".to_string());
            IdlePolicy::disabled().after_ms
        }
        Err(error) => {
            errors.push(format!("idle: {error}"));
            IdlePolicy::disabled().after_ms
        }
    };

    let interval_ms = match integer_in_range(idle.get("intervalMs"), 100, 600_000, "intervalMs") {
        Ok(value) => value,
        Err(error) => {
            errors.push(format!("idle: {error}"));
            None
        }
    };

    let mut actions = Vec::new();
    match idle.get("actions") {
        Some(JsonValue::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                match parse_idle_entry(entry) {
                    Ok(idle_entry) => actions.push(idle_entry),
                    Err(error) => errors.push(format!("idle.actions[{index}]: {error}")),
                }
            }
        }
        Some(_) => errors.push("idle.actions must be an array".to_string()),
        None => {
            if enabled {
                errors.push("idle.actions is required when idle is enabled".to_string());
            }
        }
    }

    if enabled && actions.is_empty() {
        errors.push("idle.actions has no usable entries; idle disabled".to_string());
        enabled = false;
    }

    IdlePolicy {
        enabled,
        after_ms,
        interval_ms,
        actions,
    }
}

fn parse_idle_entry(raw: &JsonValue) -> Result<IdleEntry, String> {
    let entry = raw.as_object().ok_or("entry must be an object")?;
    let action_raw = entry.get("action").ok_or("action is required")?;
    let action = parse_action(action_raw, false).map_err(|error| format!("action: {error}"))?;
    let weight = number_in_range(entry.get("weight"), 0.01, 100.0, "weight")?.unwrap_or(1.0);
    Ok(IdleEntry { action, weight })
}

fn parse_action(raw: &JsonValue, allow_combo: bool) -> Result<InputAction, String> {
    let action = raw.as_object().ok_or("action must be an object")?;
    let kind = action
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or("action.type must be a string")?;
    let cooldown_ms = integer_in_range(action.get("cooldownMs"), 0, 60_000, "cooldownMs")?;

    match kind {
        "motion" => Ok(InputAction::Motion {
            group: required_string(action.get("group"), "group")?,
            index: integer_in_range(action.get("index"), 0, 1024, "index")?,
            priority: integer_in_range(action.get("priority"), 0, 10, "priority")?,
            cooldown_ms,
        }),
        "expression" => Ok(InputAction::Expression {
            name: required_string(action.get("name"), "name")?,
            cooldown_ms,
        }),
        "tween" => {
            let preset_name = required_string(action.get("preset"), "preset")?;
            let preset = TweenPreset::parse(&preset_name)
                .ok_or_else(|| format!("unknown tween preset '{preset_name}'"))?;
            Ok(InputAction::Tween {
                preset,
                strength: number_in_range(action.get("strength"), 0.05, 3.0, "strength")?,
                cooldown_ms,
            })
        }
        "combo" if allow_combo => Ok(InputAction::Combo {
            rule_id: required_string(action.get("ruleId"), "ruleId")?,
            cooldown_ms,
        }),
        "combo" => Err("combo actions are only legal as keyMap values".to_string()),
        other => Err(format!("unknown action type '{other}'")),
    }
}

fn required_string(raw: Option<&JsonValue>, field: &str) -> Result<String, String> {
    raw.and_then(JsonValue::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("{field} must be a non-empty string"))
}

/// Integers in range clamp; non-integers reject the entry.
fn integer_in_range(
    raw: Option<&JsonValue>,
    min: u32,
    max: u32,
    field: &str,
) -> Result<Option<u32>, String> {
    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => {
            let number = value
                .as_i64()
                .ok_or_else(|| format!("{field} must be an integer"))?;
            Ok(Some(number.clamp(min as i64, max as i64) as u32))
        }
    }
}

/// Finite numbers in range clamp; anything else rejects the entry.
fn number_in_range(
    raw: Option<&JsonValue>,
    min: f32,
    max: f32,
    field: &str,
) -> Result<Option<f32>, String> {
    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => {
            let number = value
                .as_f64()
                .filter(|number| number.is_finite())
                .ok_or_else(|| format!("{field} must be a finite number"))?;
            Ok(Some((number as f32).clamp(min, max)))
        }
    }
}
