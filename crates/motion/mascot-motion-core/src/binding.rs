//! Raw input identifier resolution against a configured binding table.

use std::collections::BTreeMap;

use crate::config::InputAction;
use crate::error::EngineError;

/// Symmetric aliases between platform debug names and web
/// `KeyboardEvent.code` names. Configs may use either spelling.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("ArrowLeft", "LeftArrow"),
    ("ArrowRight", "RightArrow"),
    ("ArrowUp", "UpArrow"),
    ("ArrowDown", "DownArrow"),
    ("Enter", "Return"),
];

/// The alias partner of an identifier, if it has one.
pub fn alias_of(identifier: &str) -> Option<&'static str> {
    for (a, b) in KEY_ALIASES {
        if identifier == *a {
            return Some(b);
        }
        if identifier == *b {
            return Some(a);
        }
    }
    None
}

/// True when two identifiers name the same input, directly or via alias.
pub fn identifiers_match(a: &str, b: &str) -> bool {
    a == b || alias_of(a) == Some(b)
}

/// Normalize a free-form platform button label to a canonical identifier by
/// case-insensitive substring match. Unrecognized labels resolve to `None`.
pub fn normalize_button(label: &str) -> Option<&'static str> {
    let lower = label.to_lowercase();
    if lower.contains("left") {
        Some("MouseLeft")
    } else if lower.contains("right") {
        Some("MouseRight")
    } else if lower.contains("middle") {
        Some("MouseMiddle")
    } else {
        None
    }
}

/// Look up the action bound to an input identifier: the literal identifier
/// first, then its alias; first non-empty mapping wins. Returns the table
/// key that matched so alias spellings share one action identity.
pub fn resolve<'a>(
    key_map: &'a BTreeMap<String, InputAction>,
    identifier: &str,
) -> Result<Option<(&'a str, &'a InputAction)>, EngineError> {
    if identifier.is_empty() {
        return Err(EngineError::EmptyBinding);
    }
    if let Some((key, action)) = key_map.get_key_value(identifier) {
        return Ok(Some((key.as_str(), action)));
    }
    if let Some(alias) = alias_of(identifier) {
        if let Some((key, action)) = key_map.get_key_value(alias) {
            return Ok(Some((key.as_str(), action)));
        }
    }
    Ok(None)
}
