//! Tunable scene parameters.
//!
//! All scene kinds share one parameter set; they differ only in defaults.
//! Values come from a JSON object where every key is optional.

use serde_json::{json, Value};
use tilemaker_core::params::{param_bool, param_f64, param_string, param_usize};
use tilemaker_core::SceneError;

use crate::lifecycle::LifecycleRates;
use crate::warp::{DEFAULT_LATERAL, DEFAULT_VERTICAL};

/// Default canvas edge length in pixels.
pub const DEFAULT_SIZE: f64 = 900.0;

const DEFAULT_SEA_FRACTION: f64 = 0.08;
const DEFAULT_GRID_RESOLUTION: usize = 80;
const DEFAULT_WATER_STRIDE: usize = 2;
const DEFAULT_SHORE_RESOLUTION: usize = 120;
const DEFAULT_LOOP_SECONDS: f64 = 12.0;
const BLOCK_LOOP_SECONDS: f64 = 10.0;
const DEFAULT_HYSTERESIS: f64 = 0.05;

/// How the shoreline is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoreStyle {
    /// Stitched, smoothed contour paths from a flat sampling grid.
    Smooth,
    /// Thin filled strips per lattice cell, offset along the segment normal.
    Strips,
}

impl ShoreStyle {
    pub fn name(self) -> &'static str {
        match self {
            ShoreStyle::Smooth => "smooth",
            ShoreStyle::Strips => "strips",
        }
    }

    fn parse(name: &str, value: &str) -> Result<Self, SceneError> {
        match value {
            "smooth" => Ok(ShoreStyle::Smooth),
            "strips" => Ok(ShoreStyle::Strips),
            other => Err(SceneError::ParamTypeMismatch {
                name: name.to_string(),
                expected: "\"smooth\" or \"strips\"".to_string(),
                got: format!("\"{other}\""),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    pub max_buildings: usize,
    /// Only place buildings on cells whose four corners are above sea.
    pub land_only: bool,
    /// Sea level as a fraction of amplitude below zero.
    pub sea_fraction: f64,
    pub warp_lateral: f64,
    pub warp_vertical: f64,
    /// Samples per grid line.
    pub grid_resolution: usize,
    /// Water quads are tested on every `water_stride`-th cell.
    pub water_stride: usize,
    /// Contour grid cells per side.
    pub shore_resolution: usize,
    pub shore_style: ShoreStyle,
    /// Paint a shaded elevation ramp under the grid.
    pub terrain_tint: bool,
    /// Clip to a framed viewing window.
    pub window: bool,
    pub loop_seconds: f64,
    /// Whole sine cycles per loop for each wave component.
    pub flow_cycles: [u32; 2],
    /// Whole lattice steps slid per loop along g1 and g2.
    pub slide_steps: [u32; 2],
    pub rates: LifecycleRates,
    /// Hysteresis half-band as a fraction of the lattice step.
    pub hysteresis: f64,
}

impl TerrainParams {
    /// Defaults for the still `city` scene.
    pub fn city() -> Self {
        Self {
            max_buildings: 140,
            land_only: true,
            sea_fraction: DEFAULT_SEA_FRACTION,
            warp_lateral: DEFAULT_LATERAL,
            warp_vertical: DEFAULT_VERTICAL,
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            water_stride: DEFAULT_WATER_STRIDE,
            shore_resolution: DEFAULT_SHORE_RESOLUTION,
            shore_style: ShoreStyle::Smooth,
            terrain_tint: false,
            window: false,
            loop_seconds: DEFAULT_LOOP_SECONDS,
            flow_cycles: [1, 1],
            slide_steps: [1, 1],
            rates: LifecycleRates::default(),
            hysteresis: DEFAULT_HYSTERESIS,
        }
    }

    /// Defaults for the animated `citywave` scene.
    pub fn citywave() -> Self {
        Self {
            max_buildings: 900,
            land_only: false,
            shore_style: ShoreStyle::Strips,
            window: true,
            ..Self::city()
        }
    }

    /// Defaults for the looping `block` scene: flowing ground, fixed lattice.
    pub fn block() -> Self {
        Self {
            max_buildings: 0,
            terrain_tint: true,
            loop_seconds: BLOCK_LOOP_SECONDS,
            slide_steps: [0, 0],
            ..Self::city()
        }
    }

    /// Overlays keys present in `params` onto `defaults`.
    pub fn from_json(params: &Value, defaults: Self) -> Result<Self, SceneError> {
        let cycles = |name: &str, default: u32| -> Result<u32, SceneError> {
            let n = param_usize(params, name, default as usize)?;
            u32::try_from(n).map_err(|_| SceneError::ParamTypeMismatch {
                name: name.to_string(),
                expected: "32-bit integer".to_string(),
                got: n.to_string(),
            })
        };
        let shore = param_string(params, "shore_style", defaults.shore_style.name())?;

        Ok(Self {
            max_buildings: param_usize(params, "max_buildings", defaults.max_buildings)?,
            land_only: param_bool(params, "land_only", defaults.land_only)?,
            sea_fraction: param_f64(params, "sea_fraction", defaults.sea_fraction)?,
            warp_lateral: param_f64(params, "warp_lateral", defaults.warp_lateral)?,
            warp_vertical: param_f64(params, "warp_vertical", defaults.warp_vertical)?,
            grid_resolution: param_usize(params, "grid_resolution", defaults.grid_resolution)?.max(1),
            water_stride: param_usize(params, "water_stride", defaults.water_stride)?.max(1),
            shore_resolution: param_usize(params, "shore_resolution", defaults.shore_resolution)?
                .max(1),
            shore_style: ShoreStyle::parse("shore_style", &shore)?,
            terrain_tint: param_bool(params, "terrain_tint", defaults.terrain_tint)?,
            window: param_bool(params, "window", defaults.window)?,
            loop_seconds: param_f64(params, "loop_seconds", defaults.loop_seconds)?,
            flow_cycles: [
                cycles("flow_cycles_1", defaults.flow_cycles[0])?,
                cycles("flow_cycles_2", defaults.flow_cycles[1])?,
            ],
            slide_steps: [
                cycles("slide_steps_1", defaults.slide_steps[0])?,
                cycles("slide_steps_2", defaults.slide_steps[1])?,
            ],
            rates: LifecycleRates {
                build: param_f64(params, "build_rate", defaults.rates.build)?,
                demolish: param_f64(params, "demolish_rate", defaults.rates.demolish)?,
            },
            hysteresis: param_f64(params, "hysteresis", defaults.hysteresis)?,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "max_buildings": self.max_buildings,
            "land_only": self.land_only,
            "sea_fraction": self.sea_fraction,
            "warp_lateral": self.warp_lateral,
            "warp_vertical": self.warp_vertical,
            "grid_resolution": self.grid_resolution,
            "water_stride": self.water_stride,
            "shore_resolution": self.shore_resolution,
            "shore_style": self.shore_style.name(),
            "terrain_tint": self.terrain_tint,
            "window": self.window,
            "loop_seconds": self.loop_seconds,
            "flow_cycles_1": self.flow_cycles[0],
            "flow_cycles_2": self.flow_cycles[1],
            "slide_steps_1": self.slide_steps[0],
            "slide_steps_2": self.slide_steps[1],
            "build_rate": self.rates.build,
            "demolish_rate": self.rates.demolish,
            "hysteresis": self.hysteresis,
        })
    }

    /// Schema with `defaults` filled in.
    pub fn schema(defaults: &Self) -> Value {
        json!({
            "max_buildings": {
                "type": "integer",
                "default": defaults.max_buildings,
                "min": 0,
                "max": 5000,
                "description": "Upper bound on placed buildings"
            },
            "land_only": {
                "type": "bool",
                "default": defaults.land_only,
                "description": "Place only on cells whose four corners are above sea"
            },
            "sea_fraction": {
                "type": "number",
                "default": defaults.sea_fraction,
                "min": -1.0,
                "max": 1.0,
                "description": "Sea level as a fraction of terrain amplitude below zero"
            },
            "warp_lateral": {
                "type": "number",
                "default": defaults.warp_lateral,
                "min": 0.0,
                "max": 3.0,
                "description": "Sideways skew gain of the surface warp"
            },
            "warp_vertical": {
                "type": "number",
                "default": defaults.warp_vertical,
                "min": 0.0,
                "max": 3.0,
                "description": "Vertical lift gain of the surface warp"
            },
            "grid_resolution": {
                "type": "integer",
                "default": defaults.grid_resolution,
                "min": 1,
                "max": 400,
                "description": "Samples per warped grid line"
            },
            "water_stride": {
                "type": "integer",
                "default": defaults.water_stride,
                "min": 1,
                "max": 8,
                "description": "Lattice stride between tested water cells"
            },
            "shore_resolution": {
                "type": "integer",
                "default": defaults.shore_resolution,
                "min": 1,
                "max": 600,
                "description": "Contour sampling grid cells per side"
            },
            "shore_style": {
                "type": "string",
                "default": defaults.shore_style.name(),
                "enum": ["smooth", "strips"],
                "description": "Smoothed contour paths or per-cell strips"
            },
            "terrain_tint": {
                "type": "bool",
                "default": defaults.terrain_tint,
                "description": "Paint a shaded elevation color ramp under the grid"
            },
            "window": {
                "type": "bool",
                "default": defaults.window,
                "description": "Clip the scene to a framed viewing window"
            },
            "loop_seconds": {
                "type": "number",
                "default": defaults.loop_seconds,
                "min": 0.5,
                "max": 120.0,
                "description": "Length of one animation loop in seconds"
            },
            "flow_cycles_1": {
                "type": "integer",
                "default": defaults.flow_cycles[0],
                "min": 0,
                "max": 8,
                "description": "Sine cycles per loop of the first wave"
            },
            "flow_cycles_2": {
                "type": "integer",
                "default": defaults.flow_cycles[1],
                "min": 0,
                "max": 8,
                "description": "Sine cycles per loop of the second wave"
            },
            "slide_steps_1": {
                "type": "integer",
                "default": defaults.slide_steps[0],
                "min": 0,
                "max": 8,
                "description": "Lattice steps slid along g1 per loop"
            },
            "slide_steps_2": {
                "type": "integer",
                "default": defaults.slide_steps[1],
                "min": 0,
                "max": 8,
                "description": "Lattice steps slid along g2 per loop"
            },
            "build_rate": {
                "type": "number",
                "default": defaults.rates.build,
                "min": 0.0,
                "max": 50.0,
                "description": "Growth response rate in 1/s"
            },
            "demolish_rate": {
                "type": "number",
                "default": defaults.rates.demolish,
                "min": 0.0,
                "max": 50.0,
                "description": "Sinking response rate in 1/s"
            },
            "hysteresis": {
                "type": "number",
                "default": defaults.hysteresis,
                "min": 0.0,
                "max": 1.0,
                "description": "Half-width of the sea-level band, in lattice steps"
            }
        })
    }
}
