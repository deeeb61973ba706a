//! Capability surface the motion engine drives.
//!
//! The engine never assumes anything about the rendering runtime beyond this
//! trait: a motion-start capability, an expression-apply capability, and a
//! mutable transform. Hosts implement it over their actual rendering handle
//! and pass it into each engine call; the engine holds no reference to the
//! model and never extends its lifetime.

use crate::transform::Transform2D;

pub trait ModelRuntime {
    /// Start a motion from a named group. `Ok(false)` and `Err(_)` both count
    /// as dispatch failure to the engine.
    fn start_motion(
        &mut self,
        group: &str,
        index: Option<u32>,
        priority: Option<u32>,
    ) -> anyhow::Result<bool>;

    /// Apply a named facial expression. Same failure contract as
    /// [`ModelRuntime::start_motion`].
    fn apply_expression(&mut self, name: &str) -> anyhow::Result<bool>;

    /// Current transform snapshot of the target.
    fn transform(&self) -> Transform2D;

    /// Write a transform snapshot back to the target.
    fn set_transform(&mut self, transform: Transform2D);

    /// Optional loosely-shaped self-description (e.g. parsed model settings
    /// JSON) used for best-effort motion/expression introspection. Runtimes
    /// with no stable shape return `None` and introspection degrades to empty
    /// lists.
    fn description(&self) -> Option<serde_json::Value> {
        None
    }
}
