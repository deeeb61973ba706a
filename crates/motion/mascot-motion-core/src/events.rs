//! Input event stream contract.
//!
//! Mirrors the platform listener payloads: discrete key/button events plus
//! continuous pointer motion, each stamped with the host clock in
//! milliseconds. Source capture is an external collaborator; the engine only
//! consumes these values.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    KeyPress {
        #[serde(rename = "keyCode")]
        key_code: String,
        timestamp: u64,
    },
    KeyRelease {
        #[serde(rename = "keyCode")]
        key_code: String,
        timestamp: u64,
    },
    ButtonPress {
        button: String,
        timestamp: u64,
    },
    ButtonRelease {
        button: String,
        timestamp: u64,
    },
    MouseMove {
        x: f64,
        y: f64,
        timestamp: u64,
    },
}

impl InputEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::KeyPress { timestamp, .. }
            | Self::KeyRelease { timestamp, .. }
            | Self::ButtonPress { timestamp, .. }
            | Self::ButtonRelease { timestamp, .. }
            | Self::MouseMove { timestamp, .. } => *timestamp,
        }
    }
}
