//! Weighted random idle action selection.

use rand::Rng;

use crate::config::{IdleEntry, IdlePolicy};

/// True when an idle action should fire at `now`: enough inactivity since
/// the last discrete input, and enough spacing since the last idle firing.
pub fn idle_due(policy: &IdlePolicy, last_input_at: u64, last_idle_at: u64, now: u64) -> bool {
    if !policy.enabled || policy.actions.is_empty() {
        return false;
    }
    let after = policy.after_ms as u64;
    let interval = policy.interval_ms.map(u64::from).unwrap_or(after);
    now.saturating_sub(last_input_at) >= after && now.saturating_sub(last_idle_at) >= interval
}

/// Weighted random draw: accumulate the total weight, draw a uniform ticket
/// in `[0, total)`, and walk the entries in list order. A degenerate
/// non-positive total falls back to a uniform choice.
pub fn choose<'a, R: Rng>(rng: &mut R, entries: &'a [IdleEntry]) -> Option<(usize, &'a IdleEntry)> {
    if entries.is_empty() {
        return None;
    }

    let total: f32 = entries.iter().map(|entry| entry.weight).sum();
    if !(total > 0.0) {
        let index = rng.gen_range(0..entries.len());
        return Some((index, &entries[index]));
    }

    let mut ticket = rng.gen_range(0.0..total);
    for (index, entry) in entries.iter().enumerate() {
        if ticket < entry.weight {
            return Some((index, entry));
        }
        ticket -= entry.weight;
    }
    // Float accumulation can leave the ticket a hair past the last share.
    let last = entries.len() - 1;
    Some((last, &entries[last]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InputAction, TweenPreset};

    fn entry(weight: f32) -> IdleEntry {
        IdleEntry {
            action: InputAction::Tween {
                preset: TweenPreset::Nod,
                strength: None,
                cooldown_ms: None,
            },
            weight,
        }
    }

    fn policy(after_ms: u32, interval_ms: Option<u32>) -> IdlePolicy {
        IdlePolicy {
            enabled: true,
            after_ms,
            interval_ms,
            actions: vec![entry(1.0)],
        }
    }

    /// it should gate firing on both inactivity and re-fire interval
    #[test]
    fn gates_on_after_and_interval() {
        let p = policy(1000, Some(500));
        assert!(!idle_due(&p, 0, 0, 999));
        assert!(idle_due(&p, 0, 0, 1000));
        // Fired at 1000: interval not yet elapsed at 1400.
        assert!(!idle_due(&p, 0, 1000, 1400));
        assert!(idle_due(&p, 0, 1000, 1500));
    }

    /// it should fall back to afterMs when intervalMs is absent
    #[test]
    fn interval_defaults_to_after() {
        let p = policy(1000, None);
        assert!(!idle_due(&p, 0, 1000, 1500));
        assert!(idle_due(&p, 0, 1000, 2000));
    }

    /// it should choose uniformly when the total weight degenerates
    #[test]
    fn degenerate_total_uses_uniform() {
        let entries = vec![entry(0.0), entry(0.0)];
        let mut rng = rand::rngs::mock::StepRng::new(0, 0);
        assert!(choose(&mut rng, &entries).is_some());
    }
}
