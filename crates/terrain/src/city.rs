//! Still city scene: one frame of warped terrain with buildings on dry land.

use log::info;
use serde_json::Value;
use tilemaker_core::{DVec2, Face, Frame, FrameMeta, RandomSource, Scene, SceneError, Xorshift64};

use crate::compositor::sort_by_depth;
use crate::config::SceneConfig;
use crate::layers::{
    building_block, grid_lines, smooth_shoreline, strip_shoreline, terrain_tint, viewing_window,
    water_quads, WaterRule,
};
use crate::params::{ShoreStyle, TerrainParams};
use crate::placement::{place, BuildingSite, DensityCurve, TerrainPlacement};

pub struct City {
    config: SceneConfig,
    params: TerrainParams,
    sites: Vec<BuildingSite>,
}

impl City {
    pub fn new(size: f64, seed: u64, params: TerrainParams) -> Result<Self, SceneError> {
        let mut rng = Xorshift64::new(seed);
        Self::with_rng(size, params, &mut rng)
    }

    pub fn from_json(size: f64, seed: u64, params: &Value) -> Result<Self, SceneError> {
        Self::new(size, seed, TerrainParams::from_json(params, TerrainParams::city())?)
    }

    /// Draws config, placement and site styles from `rng`, in that order.
    pub fn with_rng(
        size: f64,
        params: TerrainParams,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SceneError> {
        let config = SceneConfig::draw(size, &params, false, rng)?;
        let sites = settle(&config, &params, rng);
        info!("city: {} buildings at step {}", sites.len(), config.basis.step());
        Ok(Self { config, params, sites })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn sites(&self) -> &[BuildingSite] {
        &self.sites
    }
}

/// Runs placement, then draws a style for each accepted cell in acceptance
/// order.
pub(crate) fn settle(
    config: &SceneConfig,
    params: &TerrainParams,
    rng: &mut dyn RandomSource,
) -> Vec<BuildingSite> {
    let model = TerrainPlacement {
        basis: &config.basis,
        field: &config.field,
        origin: config.origin,
        radius: config.placement_radius() as f64,
        land_only: params.land_only,
        curve: DensityCurve::default(),
    };
    let placement = place(&config.placement_window(), &model, params.max_buildings, rng);
    placement
        .cells
        .into_iter()
        .map(|cell| BuildingSite::draw(cell, config.hue, config.basis.step(), rng))
        .collect()
}

/// Background layers shared by both scene kinds.
pub(crate) fn base_frame(
    config: &SceneConfig,
    params: &TerrainParams,
    water: WaterRule,
    time: f64,
    offset: DVec2,
    buildings: usize,
) -> Frame {
    let warp = config.warp(time, offset);
    let mut frame = Frame::new(
        config.size,
        FrameMeta {
            buildings,
            step: config.basis.step(),
            angles: config.basis.angles(),
        },
    );
    if params.window {
        frame.window = Some(viewing_window(config.size));
    }
    if params.terrain_tint {
        frame.tint = terrain_tint(config, &warp);
    }
    frame.grid = grid_lines(config, &warp, params.grid_resolution);
    frame.water = water_quads(config, &warp, params.water_stride, water);
    frame.shoreline = match params.shore_style {
        ShoreStyle::Smooth => smooth_shoreline(config, &warp, params.shore_resolution),
        ShoreStyle::Strips => strip_shoreline(config, &warp),
    };
    frame
}

impl Scene for City {
    fn advance(&mut self, _dt: f64) -> Result<(), SceneError> {
        Ok(())
    }

    fn frame(&self) -> Frame {
        let mut frame = base_frame(
            &self.config,
            &self.params,
            WaterRule::NotAboveSea,
            0.0,
            DVec2::ZERO,
            self.sites.len(),
        );
        let warp = self.config.warp(0.0, DVec2::ZERO);
        let mut faces: Vec<Face> = self
            .sites
            .iter()
            .enumerate()
            .filter_map(|(n, site)| building_block(&self.config, &warp, n, site, 1.0, 1.0))
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
        TerrainParams::schema(&TerrainParams::city())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shoreline::cell_above_sea;
    use serde_json::json;

    fn city(seed: u64) -> City {
        City::new(600.0, seed, TerrainParams::city()).unwrap()
    }

    #[test]
    fn same_seed_builds_identical_frames() {
        let a = city(42).frame();
        let b = city(42).frame();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(city(1).frame(), city(2).frame());
    }

    #[test]
    fn faces_are_depth_sorted() {
        for seed in 0..5 {
            let frame = city(seed).frame();
            assert!(frame.is_depth_sorted(), "seed {seed}");
            assert_eq!(frame.meta.buildings, city(seed).sites().len());
        }
    }

    #[test]
    fn buildings_stand_only_on_dry_cells() {
        let c = city(7);
        let sea = c.config().field.sea_level();
        for site in c.sites() {
            let heights = c.config().cell_corners(site.cell).map(|p| c.config().field.elevation(p, 0.0));
            assert!(cell_above_sea(heights, sea), "{:?} is wet", site.cell);
        }
        assert!(c.sites().len() <= 140);
    }

    #[test]
    fn max_buildings_param_caps_sites() {
        let c = City::from_json(600.0, 3, &json!({"max_buildings": 4})).unwrap();
        assert!(c.sites().len() <= 4);
        assert_eq!(c.params()["max_buildings"], 4);
    }

    #[test]
    fn advance_is_a_no_op() {
        let mut c = city(9);
        let before = c.frame();
        c.advance(1.5).unwrap();
        assert_eq!(c.frame(), before);
        assert_eq!(c.loop_period(), None);
    }

    #[test]
    fn invalid_size_fails() {
        assert!(matches!(
            City::new(0.0, 1, TerrainParams::city()),
            Err(SceneError::InvalidDimensions)
        ));
    }

    #[test]
    fn still_scene_has_no_window_by_default() {
        let frame = city(5).frame();
        assert!(frame.window.is_none());
        assert!(frame.tint.is_empty());
        assert!(!frame.grid.is_empty());
    }

    #[test]
    fn tint_param_adds_tint_layer() {
        let c = City::from_json(400.0, 5, &json!({"terrain_tint": true})).unwrap();
        assert!(!c.frame().tint.is_empty());
    }
}
