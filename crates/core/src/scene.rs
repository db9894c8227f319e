//! The `Scene` trait every generated scene implements.
//!
//! The trait is object-safe so the CLI can hold a `Box<dyn Scene>` chosen at
//! runtime by name.

use crate::error::SceneError;
use crate::frame::Frame;
use serde_json::Value;

/// A generated scene driven by a frame callback.
///
/// `advance` is the only mutating call: it moves the scene clock forward and
/// updates any retained per-site state. `frame` is a pure read that builds
/// the depth-sorted primitives for the current instant.
pub trait Scene {
    /// Advances the scene clock by `dt` seconds.
    ///
    /// Static scenes ignore the call.
    fn advance(&mut self, dt: f64) -> Result<(), SceneError>;

    /// Builds the paintable frame for the current instant.
    fn frame(&self) -> Frame;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Length of one animation loop in seconds, or `None` for still scenes.
    fn loop_period(&self) -> Option<f64> {
        None
    }
}
