//! Looping terrain block: a parallelogram cut out of the warped ground and
//! extruded downward.
//!
//! The pane's top surface carries the usual layers clipped to its warped
//! outline. Each edge drops a rock wall to a flat bottom, and wherever the
//! ground along an edge dips below sea a translucent water wall fills up to
//! sea level. The two edges highest on screen are the far side and paint
//! before the top; the other two paint after it.

use log::{debug, info};
use serde_json::Value;
use tilemaker_core::geometry::{lerp_point, normalize_or_self, safe_ratio};
use tilemaker_core::{
    DVec2, Frame, Hsla, Pane, Path, Polygon, RandomSource, Scene, SceneError, Stroke, Xorshift64,
};

use crate::city::base_frame;
use crate::citywave::wrap_time;
use crate::config::SceneConfig;
use crate::layers::WaterRule;
use crate::params::TerrainParams;
use crate::warp::Warp;

/// Pane center as fractions of the canvas size; a little high so the walls fit.
const CENTER: (f64, f64) = (0.52, 0.46);
/// Half extents along g1 and g2 as fractions of the canvas size.
const HALF_EXTENT: (f64, f64) = (0.36, 0.30);
const DEPTH_FRACTION: f64 = 0.20;
/// Samples along each pane edge.
pub const EDGE_SAMPLES: usize = 84;
const BACK_RIM: (f64, f64) = (0.65, 1.6);
const FRONT_RIM: (f64, f64) = (0.95, 1.8);
const BORDER_WIDTH: f64 = 2.0;

fn water_wall_color() -> Hsla {
    Hsla::new(204.0, 50.0, 58.0, 0.35)
}

fn water_rim(alpha: f64, width: f64) -> Stroke {
    Stroke::new(Hsla::new(204.0, 45.0, 50.0, alpha), width)
}

/// One side of the pane top, in flat space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// 0 for A→B, 1 for B→C, 2 for C→D, 3 for D→A.
    pub index: usize,
    pub from: DVec2,
    pub to: DVec2,
}

impl Edge {
    pub fn at(&self, t: f64) -> DVec2 {
        lerp_point(self.from, self.to, t)
    }

    pub fn mean_y(&self) -> f64 {
        (self.from.y + self.to.y) / 2.0
    }

    /// Edges along g2 are lit a little more than edges along g1.
    pub fn rock_color(&self, hue: f64) -> Hsla {
        if self.index % 2 == 0 {
            Hsla::opaque(hue, 28.0, 18.0).rotate(22.0)
        } else {
            Hsla::opaque(hue, 28.0, 16.0).rotate(10.0)
        }
    }
}

/// Flat-space corners of the pane top and the wall height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneGeometry {
    pub corners: [DVec2; 4],
    pub depth: f64,
}

impl PaneGeometry {
    /// A parallelogram around `config.origin` with sides along the lattice axes.
    pub fn new(config: &SceneConfig) -> Self {
        let s = config.size;
        let u1 = normalize_or_self(config.basis.g1()) * (HALF_EXTENT.0 * s);
        let u2 = normalize_or_self(config.basis.g2()) * (HALF_EXTENT.1 * s);
        let c = config.origin;
        Self {
            corners: [c + u1 + u2, c + u1 - u2, c - u1 - u2, c - u1 + u2],
            depth: DEPTH_FRACTION * s,
        }
    }

    pub fn edges(&self) -> [Edge; 4] {
        [0, 1, 2, 3].map(|index| Edge {
            index,
            from: self.corners[index],
            to: self.corners[(index + 1) % 4],
        })
    }

    /// Edges sorted far to near by mean screen y; ties keep edge order.
    pub fn edges_by_depth(&self) -> [Edge; 4] {
        let mut edges = self.edges();
        edges.sort_by(|a, b| a.mean_y().total_cmp(&b.mean_y()).then(a.index.cmp(&b.index)));
        edges
    }

    /// Warped outline of the top, `EDGE_SAMPLES` points per edge.
    pub fn outline(&self, warp: &Warp<'_>) -> Vec<DVec2> {
        self.edges()
            .iter()
            .flat_map(|edge| {
                (0..EDGE_SAMPLES).map(move |s| warp.point(edge.at(s as f64 / EDGE_SAMPLES as f64)))
            })
            .collect()
    }

    fn bottom(&self, p: DVec2) -> DVec2 {
        p + DVec2::new(0.0, self.depth)
    }
}

/// Parameter spans `(t0, t1)` along `[0, 1]` where `height(t)` lies below
/// `sea`, found on `samples` intervals with linear refinement at each crossing.
pub fn submerged_spans(samples: usize, sea: f64, height: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
    let n = samples.max(1);
    let ts: Vec<f64> = (0..=n).map(|s| s as f64 / n as f64).collect();
    let under: Vec<bool> = ts.iter().map(|&t| height(t) < sea).collect();
    let crossing = |a: f64, b: f64| {
        let (ha, hb) = (height(a), height(b));
        (a + (b - a) * safe_ratio(sea - ha, hb - ha)).clamp(a, b)
    };

    let mut spans = Vec::new();
    let mut s = 0;
    while s <= n {
        if !under[s] {
            s += 1;
            continue;
        }
        let start = s;
        while s <= n && under[s] {
            s += 1;
        }
        let t0 = if start == 0 {
            0.0
        } else {
            crossing(ts[start - 1], ts[start])
        };
        let t1 = if s > n { 1.0 } else { crossing(ts[s - 1], ts[s]) };
        spans.push((t0, t1));
    }
    spans
}

/// Rock wall from the warped top edge down to the flat bottom edge.
fn rock_wall(geometry: &PaneGeometry, edge: &Edge, warp: &Warp<'_>, hue: f64) -> Polygon {
    let mut points: Vec<DVec2> = (0..=EDGE_SAMPLES)
        .map(|s| warp.point(edge.at(s as f64 / EDGE_SAMPLES as f64)))
        .collect();
    points.push(geometry.bottom(edge.to));
    points.push(geometry.bottom(edge.from));
    Polygon {
        points,
        fill: edge.rock_color(hue),
    }
}

/// Water wall over `span`, topped at sea level. Returns the wall and its top line.
fn water_wall(
    geometry: &PaneGeometry,
    edge: &Edge,
    (t0, t1): (f64, f64),
    lift: DVec2,
) -> (Polygon, Vec<DVec2>) {
    let m = (((t1 - t0) * EDGE_SAMPLES as f64).round() as usize).max(2);
    let ts: Vec<f64> = (0..=m).map(|k| t0 + (t1 - t0) * k as f64 / m as f64).collect();
    let top: Vec<DVec2> = ts.iter().map(|&t| edge.at(t) + lift).collect();
    let mut points = top.clone();
    points.extend(ts.iter().rev().map(|&t| geometry.bottom(edge.at(t))));
    (
        Polygon {
            points,
            fill: water_wall_color(),
        },
        top,
    )
}

/// Walls and outline for the pane at one instant.
pub fn pane(config: &SceneConfig, geometry: &PaneGeometry, warp: &Warp<'_>) -> Pane {
    let sea = config.field.sea_level();
    let lift = DVec2::new(0.0, -config.warp_vertical * sea);
    let mut pane = Pane {
        outline: geometry.outline(warp),
        back: Vec::new(),
        back_rims: Vec::new(),
        front: Vec::new(),
        front_rims: Vec::new(),
        rim: Stroke::new(Hsla::new(config.hue, 0.0, 15.0, 0.65), BORDER_WIDTH),
    };
    for (k, edge) in geometry.edges_by_depth().iter().enumerate() {
        let near = k >= 2;
        let (walls, rims, (alpha, width)) = if near {
            (&mut pane.front, &mut pane.front_rims, FRONT_RIM)
        } else {
            (&mut pane.back, &mut pane.back_rims, BACK_RIM)
        };
        for span in submerged_spans(EDGE_SAMPLES, sea, |t| warp.elevation(edge.at(t))) {
            let (wall, top) = water_wall(geometry, edge, span, lift);
            walls.push(wall);
            rims.push(Path::polyline(&top, water_rim(alpha, width)));
        }
        walls.push(rock_wall(geometry, edge, warp, config.hue));
    }
    pane
}

pub struct TerrainBlock {
    config: SceneConfig,
    params: TerrainParams,
    geometry: PaneGeometry,
    /// Seconds into the current loop, in [0, period).
    time: f64,
}

impl TerrainBlock {
    pub fn new(size: f64, seed: u64, params: TerrainParams) -> Result<Self, SceneError> {
        let mut rng = Xorshift64::new(seed);
        Self::with_rng(size, params, &mut rng)
    }

    pub fn from_json(size: f64, seed: u64, params: &Value) -> Result<Self, SceneError> {
        Self::new(size, seed, TerrainParams::from_json(params, TerrainParams::block())?)
    }

    pub fn with_rng(
        size: f64,
        params: TerrainParams,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SceneError> {
        let mut config = SceneConfig::draw(size, &params, true, rng)?;
        config.origin = DVec2::new(CENTER.0 * size, CENTER.1 * size);
        let geometry = PaneGeometry::new(&config);
        info!(
            "block: depth {:.1}, loop {}s",
            geometry.depth, params.loop_seconds
        );
        Ok(Self {
            config,
            params,
            geometry,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn geometry(&self) -> &PaneGeometry {
        &self.geometry
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

impl Scene for TerrainBlock {
    fn advance(&mut self, dt: f64) -> Result<(), SceneError> {
        self.time = wrap_time(self.time, dt, self.params.loop_seconds);
        debug!("block t={:.3}", self.time);
        Ok(())
    }

    fn frame(&self) -> Frame {
        let mut frame = base_frame(
            &self.config,
            &self.params,
            WaterRule::NotAboveSea,
            self.time,
            DVec2::ZERO,
            0,
        );
        let warp = self.config.warp(self.time, DVec2::ZERO);
        frame.pane = Some(pane(&self.config, &self.geometry, &warp));
        frame
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        TerrainParams::schema(&TerrainParams::block())
    }

    fn loop_period(&self) -> Option<f64> {
        Some(self.params.loop_seconds)
    }
}
