//! Structured diagnostic records emitted on fallback triggers and adapter
//! failures. The engine collects these for an external sink; it never
//! persists them itself.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    /// Capability method or fallback reason tag (e.g. `startMotion`,
    /// `fallback`).
    pub method: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Milliseconds, host clock.
    pub timestamp: u64,
}

impl DiagnosticRecord {
    pub fn new(
        method: impl Into<String>,
        message: impl Into<String>,
        cause: Option<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            method: method.into(),
            message: message.into(),
            cause,
            timestamp,
        }
    }
}
