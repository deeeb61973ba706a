//! Mascot Motion Core (engine-agnostic)
//!
//! Converts discrete user-input events and elapsed idle time into animation
//! actions — motions, facial expressions, procedural tweens — against a
//! narrow model-runtime capability surface, guaranteeing the character
//! always visibly reacts even when the runtime cannot execute the requested
//! action. This crate defines the configuration model and validator, the
//! binding/combo/idle/cooldown state machine, the frame-synchronous input
//! scheduler, the procedural fallback tween engine, and the defensive model
//! adapter.

pub mod adapter;
pub mod binding;
pub mod combo;
pub mod config;
pub mod cooldown;
pub mod diag;
pub mod engine;
pub mod error;
pub mod events;
pub mod idle;
pub mod outputs;
pub mod schedule;
pub mod state;
pub mod tween;
pub mod validate;

// Re-exports for consumers (hosts/adapters)
pub use adapter::ModelAdapter;
pub use combo::ComboDetector;
pub use config::{ComboRule, IdleEntry, IdlePolicy, InputAction, MotionConfig, TweenPreset};
pub use cooldown::CooldownLedger;
pub use diag::{DiagnosticsHub, DiagnosticsSnapshot, InputHealth};
pub use engine::{MotionEngine, INPUT_HEALTH_GRACE_MS};
pub use error::EngineError;
pub use events::InputEvent;
pub use outputs::{EngineEvent, Outputs};
pub use schedule::{DiscreteInput, FrameQueue, PointerSample, DISCRETE_QUEUE_CAP};
pub use state::{EngineState, IdAllocator, ModelId};
pub use tween::{preset_from_name, preset_transform, TweenPlayer};
pub use validate::{normalize, resolve_or_default, Normalized};

pub use mascot_api_core::{DiagnosticRecord, ModelRuntime, Transform2D, Vec2};
