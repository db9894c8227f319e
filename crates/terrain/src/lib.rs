#![deny(unsafe_code)]
//! Terrain scene synthesizer.
//!
//! Builds stylized isometric city scenes: an oblique lattice warped by a
//! closed-form height field, translucent water below sea level, a
//! marching-squares shoreline, and extruded buildings composited back to
//! front. Three scene kinds are registered:
//!
//! - `city`: a still frame with buildings on dry land only.
//! - `citywave`: a perfect loop where terrain flows, the lattice slides, and
//!   buildings grow or sink as their ground crosses sea level.
//! - `block`: a looping slab of flowing terrain cut out and extruded, with
//!   rock walls and water walls where an edge dips below sea.

pub mod basis;
pub mod block;
pub mod city;
pub mod citywave;
pub mod compositor;
pub mod config;
pub mod height;
pub mod layers;
pub mod lifecycle;
pub mod paint;
pub mod params;
pub mod placement;
pub mod shoreline;
pub mod warp;

pub use basis::{Basis, LatticeCell};
pub use block::TerrainBlock;
pub use city::City;
pub use citywave::CityWave;
pub use config::SceneConfig;
pub use height::HeightField;
pub use paint::{paint, render_svg};
pub use params::{ShoreStyle, TerrainParams, DEFAULT_SIZE};

use serde_json::Value;
use tilemaker_core::{Scene, SceneError};

/// Registered scene kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    City,
    CityWave,
    Block,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::City, SceneKind::CityWave, SceneKind::Block];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::City => "city",
            SceneKind::CityWave => "citywave",
            SceneKind::Block => "block",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneKind::City => "Still city on warped terrain, buildings on dry land only",
            SceneKind::CityWave => "Looping city whose buildings grow and sink with the tide",
            SceneKind::Block => "Looping slab of flowing terrain with rock and water walls",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, SceneError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }

    pub fn default_params(self) -> TerrainParams {
        match self {
            SceneKind::City => TerrainParams::city(),
            SceneKind::CityWave => TerrainParams::citywave(),
            SceneKind::Block => TerrainParams::block(),
        }
    }

    /// Builds the scene from a seed and a JSON params object.
    pub fn build(self, size: f64, seed: u64, params: &Value) -> Result<Box<dyn Scene>, SceneError> {
        Ok(match self {
            SceneKind::City => Box::new(City::from_json(size, seed, params)?),
            SceneKind::CityWave => Box::new(CityWave::from_json(size, seed, params)?),
            SceneKind::Block => Box::new(TerrainBlock::from_json(size, seed, params)?),
        })
    }

    /// Whether the scene loops over time.
    pub fn animated(self) -> bool {
        !matches!(self, SceneKind::City)
    }

    pub fn schema(self) -> Value {
        TerrainParams::schema(&self.default_params())
    }
}

/// Looks up `name` and builds it.
pub fn create_scene(
    name: &str,
    size: f64,
    seed: u64,
    params: &Value,
) -> Result<Box<dyn Scene>, SceneError> {
    SceneKind::from_name(name)?.build(size, seed, params)
}

/// Advances `scene` by `seconds` in ticks of at most `tick`.
pub fn run_for(scene: &mut dyn Scene, seconds: f64, tick: f64) -> Result<(), SceneError> {
    let valid = seconds.is_finite() && seconds > 0.0 && tick.is_finite() && tick > 0.0;
    if !valid {
        return Ok(());
    }
    let steps = (seconds / tick).ceil() as usize;
    let dt = seconds / steps as f64;
    for _ in 0..steps {
        scene.advance(dt)?;
    }
    Ok(())
}
