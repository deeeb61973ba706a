//! Motion configuration model (validated form).
//!
//! `MotionConfig` is immutable once validated: callers obtain new values via
//! [`crate::validate::normalize`] and clone the whole structure when they
//! need an independent copy. `Clone` on these types is a deep clone; no
//! nested action is shared between a config and its clone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Procedural tween presets available to `Tween` actions and the fallback
/// path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweenPreset {
    Bounce,
    Shake,
    Nod,
}

impl TweenPreset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bounce" => Some(Self::Bounce),
            "shake" => Some(Self::Shake),
            "nod" => Some(Self::Nod),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bounce => "bounce",
            Self::Shake => "shake",
            Self::Nod => "nod",
        }
    }

    /// Nominal duration of the preset in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        match self {
            Self::Bounce => 340,
            Self::Shake => 260,
            Self::Nod => 320,
        }
    }
}

/// One configured reaction. `Combo` is only legal as a keyMap value; rule
/// actions and idle entries must carry one of the other variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputAction {
    #[serde(rename_all = "camelCase")]
    Motion {
        group: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cooldown_ms: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Expression {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cooldown_ms: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Tween {
        preset: TweenPreset,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strength: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cooldown_ms: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Combo {
        rule_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cooldown_ms: Option<u32>,
    },
}

impl InputAction {
    pub fn cooldown_ms(&self) -> Option<u32> {
        match self {
            Self::Motion { cooldown_ms, .. }
            | Self::Expression { cooldown_ms, .. }
            | Self::Tween { cooldown_ms, .. }
            | Self::Combo { cooldown_ms, .. } => *cooldown_ms,
        }
    }

    pub fn is_combo(&self) -> bool {
        matches!(self, Self::Combo { .. })
    }
}

/// A timed input subsequence that resolves to a single action when matched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboRule {
    pub id: String,
    /// Ordered input identifiers, length >= 2.
    pub sequence: Vec<String>,
    /// First-to-last timestamp span bound, inclusive.
    pub within_ms: u32,
    /// Never `InputAction::Combo`.
    pub action: InputAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u32>,
}

fn default_weight() -> f32 {
    1.0
}

/// An action eligible for weighted random selection during inactivity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdleEntry {
    /// Never `InputAction::Combo`.
    pub action: InputAction,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlePolicy {
    pub enabled: bool,
    /// Inactivity threshold before the first idle action may fire.
    pub after_ms: u32,
    /// Re-fire interval; falls back to `after_ms` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u32>,
    /// Non-empty whenever `enabled` is true.
    pub actions: Vec<IdleEntry>,
}

impl IdlePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            after_ms: 15_000,
            interval_ms: None,
            actions: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    MotionConfig::VERSION
}

/// Aggregate motion configuration: input bindings, combo rules, idle policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Input identifier -> action; at least one entry.
    pub key_map: BTreeMap<String, InputAction>,
    /// Tested in order on every discrete input; first match wins.
    #[serde(default)]
    pub combo_rules: Vec<ComboRule>,
    pub idle: IdlePolicy,
}

impl MotionConfig {
    pub const VERSION: u32 = 1;

    /// Built-in fallback used when an untrusted config document yields zero
    /// usable bindings. Callers receive a fresh value each time.
    pub fn builtin_default() -> Self {
        let mut key_map = BTreeMap::new();
        key_map.insert(
            "MouseLeft".to_string(),
            InputAction::Motion {
                group: "TapBody".to_string(),
                index: None,
                priority: Some(3),
                cooldown_ms: Some(800),
            },
        );
        key_map.insert(
            "MouseRight".to_string(),
            InputAction::Expression {
                name: "Smile".to_string(),
                cooldown_ms: Some(600),
            },
        );
        key_map.insert(
            "Space".to_string(),
            InputAction::Tween {
                preset: TweenPreset::Bounce,
                strength: Some(1.0),
                cooldown_ms: Some(400),
            },
        );

        let combo_rules = vec![ComboRule {
            id: "wave-hello".to_string(),
            sequence: vec!["KeyH".to_string(), "KeyI".to_string()],
            within_ms: 600,
            action: InputAction::Motion {
                group: "Greeting".to_string(),
                index: None,
                priority: Some(3),
                cooldown_ms: None,
            },
            cooldown_ms: Some(2000),
        }];

        let idle = IdlePolicy {
            enabled: true,
            after_ms: 15_000,
            interval_ms: Some(8_000),
            actions: vec![
                IdleEntry {
                    action: InputAction::Motion {
                        group: "Idle".to_string(),
                        index: None,
                        priority: Some(1),
                        cooldown_ms: None,
                    },
                    weight: 3.0,
                },
                IdleEntry {
                    action: InputAction::Tween {
                        preset: TweenPreset::Nod,
                        strength: Some(0.8),
                        cooldown_ms: None,
                    },
                    weight: 1.0,
                },
            ],
        };

        Self {
            version: Self::VERSION,
            key_map,
            combo_rules,
            idle,
        }
    }

    /// Length of the longest configured combo sequence, for buffer sizing.
    pub fn longest_sequence(&self) -> usize {
        self.combo_rules
            .iter()
            .map(|rule| rule.sequence.len())
            .max()
            .unwrap_or(0)
    }
}
