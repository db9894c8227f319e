//! Settlement placement.
//!
//! Candidate cells in a centered lattice window are visited in shuffled
//! order. A cell is accepted with a probability supplied by a
//! [`PlacementModel`]. Accepting claims the cell's 2×2 block, and a
//! candidate whose own block would cover an accepted site is skipped, so no
//! site's block ever holds another site.

use std::collections::HashSet;

use log::debug;
use tilemaker_core::prng::{shuffle, RandomSource};
use tilemaker_core::DVec2;

use crate::basis::{Basis, LatticeCell};
use crate::height::HeightField;
use crate::shoreline::cell_above_sea;

/// Inclusive rectangular range of lattice cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWindow {
    pub i_min: i32,
    pub i_max: i32,
    pub j_min: i32,
    pub j_max: i32,
}

impl CellWindow {
    /// `[-radius, radius - 1]` on both axes.
    pub fn centered(radius: i32) -> Self {
        let r = radius.max(1);
        Self {
            i_min: -r,
            i_max: r - 1,
            j_min: -r,
            j_max: r - 1,
        }
    }

    /// Candidates in row-major order (j outer, i inner).
    pub fn cells(&self) -> Vec<LatticeCell> {
        (self.j_min..=self.j_max)
            .flat_map(|j| (self.i_min..=self.i_max).map(move |i| LatticeCell::new(i, j)))
            .collect()
    }

    pub fn contains(&self, cell: LatticeCell) -> bool {
        (self.i_min..=self.i_max).contains(&cell.i) && (self.j_min..=self.j_max).contains(&cell.j)
    }
}

/// Decides where buildings may go and how likely each cell is to be built on.
pub trait PlacementModel {
    /// Cells that fail this check are never built on.
    fn is_buildable(&self, cell: LatticeCell) -> bool;

    /// Acceptance probability in [0, 1]. May consume draws from `rng`.
    fn acceptance(&self, cell: LatticeCell, rng: &mut dyn RandomSource) -> f64;
}

/// Outcome of a placement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Accepted cells in acceptance order.
    pub cells: Vec<LatticeCell>,
    /// Every cell covered by an accepted cell's 2×2 block.
    pub claimed: HashSet<LatticeCell>,
}

/// Runs the shuffled accept/claim pass over `window`.
pub fn place(
    window: &CellWindow,
    model: &dyn PlacementModel,
    max_sites: usize,
    rng: &mut dyn RandomSource,
) -> Placement {
    let mut candidates = window.cells();
    shuffle(&mut candidates, rng);

    let mut placement = Placement::default();
    let mut accepted: HashSet<LatticeCell> = HashSet::new();
    let mut skipped_claimed = 0usize;
    for cell in candidates {
        if placement.cells.len() >= max_sites {
            break;
        }
        if placement.claimed.contains(&cell) || cell.block().iter().any(|c| accepted.contains(c)) {
            skipped_claimed += 1;
            continue;
        }
        if !model.is_buildable(cell) {
            continue;
        }
        let p = model.acceptance(cell, rng);
        if rng.next_f64() >= p {
            continue;
        }
        placement.claimed.extend(cell.block());
        accepted.insert(cell);
        placement.cells.push(cell);
    }
    debug!(
        "placed {} of max {} sites ({} candidates skipped as claimed)",
        placement.cells.len(),
        max_sites,
        skipped_claimed
    );
    placement
}

/// Identity and style of one accepted building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingSite {
    pub cell: LatticeCell,
    pub hue: f64,
    pub saturation: f64,
    pub height_base: f64,
}

impl BuildingSite {
    /// Draws base height, hue jitter and saturation, in that order.
    pub fn draw(cell: LatticeCell, base_hue: f64, step: f64, rng: &mut dyn RandomSource) -> Self {
        let height_base = step * (0.9 + 3.1 * rng.next_f64());
        let hue = base_hue + (24.0 * rng.next_f64() - 12.0).trunc();
        let saturation = 62.0 + (12.0 * rng.next_f64()).floor();
        Self {
            cell,
            hue,
            saturation,
            height_base,
        }
    }

    /// Drier ground builds taller.
    pub fn height(&self, dryness: f64) -> f64 {
        self.height_base * (0.5 + 0.8 * dryness)
    }
}

/// Shape of the acceptance curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityCurve {
    pub base: f64,
    pub density_scale: f64,
    pub centrality_floor: f64,
    pub centrality_scale: f64,
    /// Maximum random shift applied to the normalized radius.
    pub jitter: f64,
}

impl Default for DensityCurve {
    fn default() -> Self {
        Self {
            base: 0.08,
            density_scale: 0.55,
            centrality_floor: 0.35,
            centrality_scale: 0.65,
            jitter: 0.25,
        }
    }
}

impl DensityCurve {
    /// Triangular falloff: 1 at the center, 0 at ±1 normalized radius.
    pub fn center_bias(&self, x: f64, rng: &mut dyn RandomSource) -> f64 {
        let t = x + rng.next_f64() * self.jitter;
        (1.0 - t.abs()).max(0.0)
    }

    pub fn probability(&self, dryness: f64, centrality: f64) -> f64 {
        self.base
            + self.density_scale * dryness * (self.centrality_floor + self.centrality_scale * centrality)
    }
}

/// Placement driven by the terrain: drier, more central cells are likelier.
#[derive(Debug, Clone, Copy)]
pub struct TerrainPlacement<'a> {
    pub basis: &'a Basis,
    pub field: &'a HeightField,
    pub origin: DVec2,
    pub radius: f64,
    /// Require all four corners above sea (still scenes). Animated scenes
    /// place on any cell and let the lifecycle hide flooded sites.
    pub land_only: bool,
    pub curve: DensityCurve,
}

impl TerrainPlacement<'_> {
    /// Dryness at the cell center at time 0.
    pub fn dryness(&self, cell: LatticeCell) -> f64 {
        let mid = self.basis.cell_center(self.origin, cell);
        self.field.dryness(self.field.elevation(mid, 0.0))
    }
}

impl PlacementModel for TerrainPlacement<'_> {
    fn is_buildable(&self, cell: LatticeCell) -> bool {
        if !self.land_only {
            return true;
        }
        let heights = self
            .basis
            .cell_corners(self.origin, cell)
            .map(|p| self.field.elevation(p, 0.0));
        cell_above_sea(heights, self.field.sea_level())
    }

    fn acceptance(&self, cell: LatticeCell, rng: &mut dyn RandomSource) -> f64 {
        let radius = self.radius.max(1.0);
        let cb_i = self.curve.center_bias(cell.i as f64 / radius, rng);
        let cb_j = self.curve.center_bias(cell.j as f64 / radius, rng);
        self.curve.probability(self.dryness(cell), cb_i * cb_j)
    }
}
