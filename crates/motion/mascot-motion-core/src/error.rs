//! Engine error types for programming-contract violations.
//!
//! Malformed configuration is data (see `validate`), and runtime dispatch
//! failures are recovered by the fallback tween; only caller contract
//! violations surface as `EngineError`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// Binding identifiers must be non-empty strings.
    #[error("binding identifier must be non-empty")]
    EmptyBinding,

    /// Preset names are restricted to the known procedural tweens.
    #[error("unknown tween preset: {name}")]
    UnknownPreset { name: String },
}
