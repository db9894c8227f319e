//! Per-scene random draws, made once and then frozen.

use log::info;
use tilemaker_core::prng::RandomSource;
use tilemaker_core::{DVec2, SceneError};

use crate::basis::{Basis, LatticeCell};
use crate::height::HeightField;
use crate::params::TerrainParams;
use crate::placement::CellWindow;
use crate::warp::Warp;

/// Lattice lines needed to cover the canvas, as a multiple of its size.
const COVERAGE: f64 = 2.4;
/// Placement radius is this many lines short of full coverage.
const RADIUS_INSET: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub size: f64,
    pub basis: Basis,
    pub field: HeightField,
    /// Base hue in whole degrees.
    pub hue: f64,
    /// Flat-space position of lattice node (0, 0): the canvas center.
    pub origin: DVec2,
    /// Half-count of lattice lines on each axis.
    pub lines: i32,
    pub warp_lateral: f64,
    pub warp_vertical: f64,
}

impl SceneConfig {
    /// Draws basis, base hue and height field, in that order.
    ///
    /// `loop_field` animates the field with whole cycles per loop.
    pub fn draw(
        size: f64,
        params: &TerrainParams,
        loop_field: bool,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SceneError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(SceneError::InvalidDimensions);
        }
        let basis = Basis::draw(rng);
        let hue = (rng.next_f64() * 360.0).floor();
        let mut field = HeightField::draw(basis.step(), params.sea_fraction, rng);
        if loop_field {
            field = field.with_loop(params.loop_seconds, params.flow_cycles);
        }
        let lines = (COVERAGE * size / basis.step()).ceil() as i32;
        let (a1, a2) = basis.angles();
        info!(
            "scene config: step {} angles {:.1},{:.1} amplitude {:.1} hue {} lines {}",
            basis.step(),
            a1,
            a2,
            field.amplitude(),
            hue,
            lines
        );
        Ok(Self {
            size,
            basis,
            field,
            hue,
            origin: DVec2::splat(size / 2.0),
            lines,
            warp_lateral: params.warp_lateral,
            warp_vertical: params.warp_vertical,
        })
    }

    /// Candidate window for building placement.
    pub fn placement_window(&self) -> CellWindow {
        CellWindow::centered(self.placement_radius())
    }

    pub fn placement_radius(&self) -> i32 {
        (self.lines - RADIUS_INSET).max(1)
    }

    pub fn warp(&self, time: f64, offset: DVec2) -> Warp<'_> {
        Warp::new(&self.field, self.warp_lateral, self.warp_vertical)
            .at_time(time)
            .with_offset(offset)
    }

    pub fn lattice_point(&self, i: f64, j: f64) -> DVec2 {
        self.basis.lattice_point(self.origin, i, j)
    }

    pub fn cell_corners(&self, cell: LatticeCell) -> [DVec2; 4] {
        self.basis.cell_corners(self.origin, cell)
    }

    pub fn cell_center(&self, cell: LatticeCell) -> DVec2 {
        self.basis.cell_center(self.origin, cell)
    }

    /// Hysteresis half-band in height units.
    pub fn hysteresis_band(&self, fraction: f64) -> f64 {
        self.basis.step() * fraction
    }
}
