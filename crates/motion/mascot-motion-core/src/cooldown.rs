//! Per-action-identity suppression windows.
//!
//! Identities are namespaced (`key:`, `combo:`, `idle:`) so keyMap bindings,
//! combo rules, and idle selections never share a cooldown bucket.

use hashbrown::HashMap;

pub fn key_identity(identifier: &str) -> String {
    format!("key:{identifier}")
}

pub fn combo_identity(rule_id: &str) -> String {
    format!("combo:{rule_id}")
}

pub fn idle_identity(index: usize) -> String {
    format!("idle:{index}")
}

#[derive(Clone, Debug, Default)]
pub struct CooldownLedger {
    last_fired: HashMap<String, u64>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the identity may fire at `now`; records the firing on allow.
    /// Absence of a cooldown means no suppression.
    pub fn allow(&mut self, identity: &str, cooldown_ms: Option<u32>, now: u64) -> bool {
        if let Some(cooldown) = cooldown_ms {
            if let Some(last) = self.last_fired.get(identity) {
                if now.saturating_sub(*last) < cooldown as u64 {
                    return false;
                }
            }
        }
        self.last_fired.insert(identity.to_string(), now);
        true
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}
