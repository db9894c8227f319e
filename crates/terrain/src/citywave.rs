//! Animated city scene that loops perfectly.
//!
//! The height field phase advances by whole cycles per loop and the lattice
//! slides by whole steps, so time `period` looks like time 0. Each site keeps
//! a [`SiteLifecycle`] and its last built faces; `advance` updates both in
//! place and `frame` only reads them.

use log::{debug, info};
use serde_json::Value;
use tilemaker_core::{DVec2, Face, Frame, RandomSource, Scene, SceneError, Xorshift64};

use crate::city::{base_frame, settle};
use crate::compositor::sort_by_depth;
use crate::config::SceneConfig;
use crate::layers::{building_block, WaterRule};
use crate::lifecycle::{Occupancy, SiteLifecycle};
use crate::params::TerrainParams;
use crate::placement::BuildingSite;

/// `time + dt` folded into `[0, period)`; non-finite or negative `dt` counts
/// as 0 and a non-positive period never wraps.
pub(crate) fn wrap_time(time: f64, dt: f64, period: f64) -> f64 {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    if period > 0.0 {
        (time + dt).rem_euclid(period)
    } else {
        time + dt
    }
}

/// Retained per-site state.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub site: BuildingSite,
    pub lifecycle: SiteLifecycle,
    /// Faces from the last update; `None` while hidden or off canvas.
    pub faces: Option<[Face; 5]>,
}

pub struct CityWave {
    config: SceneConfig,
    params: TerrainParams,
    records: Vec<SiteRecord>,
    /// Seconds into the current loop, in [0, period).
    time: f64,
}

impl CityWave {
    pub fn new(size: f64, seed: u64, params: TerrainParams) -> Result<Self, SceneError> {
        let mut rng = Xorshift64::new(seed);
        Self::with_rng(size, params, &mut rng)
    }

    pub fn from_json(size: f64, seed: u64, params: &Value) -> Result<Self, SceneError> {
        Self::new(size, seed, TerrainParams::from_json(params, TerrainParams::citywave())?)
    }

    /// Sites start settled: built where their ground is above sea at time 0.
    pub fn with_rng(
        size: f64,
        params: TerrainParams,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SceneError> {
        let config = SceneConfig::draw(size, &params, true, rng)?;
        let sea = config.field.sea_level();
        let records = settle(&config, &params, rng)
            .into_iter()
            .map(|site| {
                let mid = config.field.elevation(config.cell_center(site.cell), 0.0);
                let start = if mid > sea {
                    Occupancy::Land
                } else {
                    Occupancy::Water
                };
                SiteRecord {
                    site,
                    lifecycle: SiteLifecycle::settled(start),
                    faces: None,
                }
            })
            .collect();
        let mut scene = Self {
            config,
            params,
            records,
            time: 0.0,
        };
        scene.rebuild(0.0);
        info!(
            "citywave: {} sites, {} standing, loop {}s",
            scene.records.len(),
            scene.standing(),
            scene.params.loop_seconds
        );
        Ok(scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Sites currently visible.
    pub fn standing(&self) -> usize {
        self.records.iter().filter(|r| r.faces.is_some()).count()
    }

    /// Fraction of the loop elapsed, in [0, 1).
    pub fn phase(&self) -> f64 {
        let period = self.params.loop_seconds;
        if period > 0.0 {
            self.time / period
        } else {
            0.0
        }
    }

    /// Lattice slide for the current phase: whole steps per loop.
    pub fn slide_offset(&self) -> DVec2 {
        let s = self.phase();
        let [s1, s2] = self.params.slide_steps;
        self.config.basis.g1() * (s1 as f64 * s) + self.config.basis.g2() * (s2 as f64 * s)
    }

    /// Updates every record for the current time, stepping lifecycles by `dt`.
    fn rebuild(&mut self, dt: f64) {
        let warp = self.config.warp(self.time, self.slide_offset());
        let sea = self.config.field.sea_level();
        let band = self.config.hysteresis_band(self.params.hysteresis);
        let rates = self.params.rates;
        for (n, record) in self.records.iter_mut().enumerate() {
            let mid = warp.apply(self.config.cell_center(record.site.cell));
            record.lifecycle.update(mid.height, sea, band, rates, dt);
            record.faces = if record.lifecycle.is_visible() {
                let grow = record.lifecycle.eased();
                building_block(&self.config, &warp, n, &record.site, grow, grow)
            } else {
                None
            };
        }
    }
}

impl Scene for CityWave {
    fn advance(&mut self, dt: f64) -> Result<(), SceneError> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time = wrap_time(self.time, dt, self.params.loop_seconds);
        self.rebuild(dt);
        debug!("citywave t={:.3} standing {}", self.time, self.standing());
        Ok(())
    }

    fn frame(&self) -> Frame {
        let mut frame = base_frame(
            &self.config,
            &self.params,
            WaterRule::Submerged,
            self.time,
            self.slide_offset(),
            self.records.len(),
        );
        let mut faces: Vec<Face> = self
            .records
            .iter()
            .filter_map(|r| r.faces.clone())
            .flatten()
            .collect();
        sort_by_depth(&mut faces);
        frame.faces = faces;
        frame
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        TerrainParams::schema(&TerrainParams::citywave())
    }

    fn loop_period(&self) -> Option<f64> {
        Some(self.params.loop_seconds)
    }
}
