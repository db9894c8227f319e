//! Per-frame geometry for the background layers and building blocks.
//!
//! Every function here is a pure read of the scene config and a [`Warp`]
//! fixed at one instant; scenes call them from `frame()`.

use log::debug;
use tilemaker_core::frame::{Path, PathCommand, Polygon, Stroke, Window};
use tilemaker_core::geometry::{normalize_or_self, Bounds};
use tilemaker_core::{DVec2, Face, Hsla, Srgb};

use crate::basis::LatticeCell;
use crate::compositor::{building_faces, BlockStyle};
use crate::config::SceneConfig;
use crate::placement::BuildingSite;
use crate::shoreline::{
    cell_above_sea, cell_segments, cell_submerged, march, smooth_path, stitch, strip, ContourGrid,
    STITCH_TOLERANCE,
};
use crate::warp::Warp;

const GRID_WIDTH: f64 = 1.1;
/// Extra lattice lines drawn past the coverage count.
const GRID_OVERSCAN: i32 = 2;
/// Contour sampling and culling margin as a fraction of canvas size.
const MARGIN_FRACTION: f64 = 0.1;
/// Strip thickness as a fraction of the lattice step.
const STRIP_PAD: f64 = 0.15;
const SHORE_WIDTH: f64 = 1.6;
/// Light direction for the terrain tint (screen space, toward upper left).
const LIGHT: DVec2 = DVec2::new(-0.7, -0.6);
const SHADE_GAIN: f64 = 0.35;
const TINT_ALPHA: f64 = 0.55;
const WINDOW_FRACTION: f64 = 0.86;
const WINDOW_BORDER: f64 = 28.0;
const WINDOW_RADIUS: f64 = 6.0;
/// `#121212`.
const BORDER_GRAY: f64 = 18.0 / 255.0;

/// Which lattice cells get a water quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterRule {
    /// Any cell not entirely above sea.
    NotAboveSea,
    /// Only cells entirely below sea.
    Submerged,
}

/// Screen rectangle outside which geometry is dropped.
pub fn cull_bounds(size: f64) -> Bounds {
    Bounds::square(size, size * MARGIN_FRACTION)
}

/// Flat-space rectangle that can still warp onto the canvas.
fn reach_bounds(config: &SceneConfig, offset: DVec2) -> Bounds {
    let reach = config.size * MARGIN_FRACTION
        + config.field.amplitude() * (config.warp_vertical.abs() + config.warp_lateral.abs())
        + config.basis.step();
    let b = Bounds::square(config.size, reach);
    Bounds {
        min: b.min - offset,
        max: b.max - offset,
    }
}

pub fn grid_colors(hue: f64) -> [Hsla; 2] {
    let first = Hsla::new(hue, 30.0, 40.0, 0.6);
    [first, first.rotate(12.0)]
}

pub fn water_color(hue: f64) -> Hsla {
    Hsla::new(hue + 190.0, 45.0, 55.0, 0.18)
}

pub fn coast_color(hue: f64) -> Hsla {
    Hsla::new(hue + 180.0, 55.0, 52.0, 0.25)
}

pub fn shore_stroke_color(hue: f64) -> Hsla {
    Hsla::new(hue + 180.0, 55.0, 45.0, 0.7)
}

/// Warped lattice lines: one family along g1, one along g2.
pub fn grid_lines(config: &SceneConfig, warp: &Warp<'_>, resolution: usize) -> Vec<Path> {
    let bounds = cull_bounds(config.size);
    let span = (config.lines * 2 + 6) as f64;
    let colors = grid_colors(config.hue);
    let reach = config.lines + GRID_OVERSCAN;
    let resolution = resolution.max(1);

    let mut paths = Vec::new();
    for (family, color) in colors.into_iter().enumerate() {
        for k in -reach..=reach {
            let k = k as f64;
            let (a, b) = if family == 0 {
                (config.lattice_point(-span, k), config.lattice_point(span, k))
            } else {
                (config.lattice_point(k, -span), config.lattice_point(k, span))
            };
            let points: Vec<DVec2> = (0..=resolution)
                .map(|s| warp.point(a.lerp(b, s as f64 / resolution as f64)))
                .collect();
            if bounds.overlaps(&points) {
                paths.push(Path::polyline(&points, Stroke::new(color, GRID_WIDTH)));
            }
        }
    }
    paths
}

/// Translucent quads over watery lattice cells, every `stride`-th cell.
pub fn water_quads(config: &SceneConfig, warp: &Warp<'_>, stride: usize, rule: WaterRule) -> Vec<Polygon> {
    let bounds = cull_bounds(config.size);
    let reach = reach_bounds(config, warp.offset());
    let sea = config.field.sea_level();
    let fill = water_color(config.hue);
    let lo = -config.lines + 1;
    let hi = config.lines - 2;

    let mut quads = Vec::new();
    for j in (lo..hi).step_by(stride.max(1)) {
        for i in (lo..hi).step_by(stride.max(1)) {
            let corners = config.cell_corners(LatticeCell::new(i, j));
            if !reach.overlaps(&corners) {
                continue;
            }
            let warped = corners.map(|p| warp.apply(p));
            let heights = warped.map(|w| w.height);
            let wet = match rule {
                WaterRule::NotAboveSea => !cell_above_sea(heights, sea),
                WaterRule::Submerged => cell_submerged(heights, sea),
            };
            let points = warped.map(|w| w.screen);
            if wet && bounds.overlaps(&points) {
                quads.push(Polygon {
                    points: points.to_vec(),
                    fill,
                });
            }
        }
    }
    quads
}

/// Elevation color stops as (height above sea / amplitude, hsl).
const RAMP: [(f64, (f64, f64, f64)); 6] = [
    (-0.70, (210.0, 70.0, 24.0)),
    (-0.15, (204.0, 65.0, 42.0)),
    (0.00, (50.0, 80.0, 62.0)),
    (0.20, (95.0, 60.0, 58.0)),
    (0.55, (115.0, 50.0, 36.0)),
    (0.90, (0.0, 0.0, 94.0)),
];

/// Ramp color for elevation `h`, piecewise linear between stops.
pub fn ramp_color(h: f64, sea: f64, amplitude: f64) -> Hsla {
    let x = if amplitude > 0.0 { (h - sea) / amplitude } else { 0.0 };
    let (first, last) = (RAMP[0], RAMP[RAMP.len() - 1]);
    if x <= first.0 {
        let (hh, s, l) = first.1;
        return Hsla::opaque(hh, s, l);
    }
    for pair in RAMP.windows(2) {
        let (x0, c0) = pair[0];
        let (x1, c1) = pair[1];
        if x <= x1 {
            let t = (x - x0) / (x1 - x0);
            let lerp = |a: f64, b: f64| a + (b - a) * t;
            return Hsla::opaque(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (hh, s, l) = last.1;
    Hsla::opaque(hh, s, l)
}

/// Lambert-ish lightness scale from the terrain gradient.
pub fn shade(base: Hsla, gradient: DVec2) -> Hsla {
    let light = normalize_or_self(LIGHT);
    let lambert = (0.5 - SHADE_GAIN * gradient.dot(light)).clamp(0.0, 1.0);
    Hsla {
        l: (base.l * (0.75 + 0.5 * lambert)).clamp(5.0, 95.0),
        ..base
    }
}

/// Shaded elevation ramp, one quad per lattice cell.
pub fn terrain_tint(config: &SceneConfig, warp: &Warp<'_>) -> Vec<Polygon> {
    let bounds = cull_bounds(config.size);
    let reach = reach_bounds(config, warp.offset());
    let sea = config.field.sea_level();
    let amplitude = config.field.amplitude();
    let lo = -config.lines + 1;
    let hi = config.lines - 1;

    let mut quads = Vec::new();
    for j in lo..hi {
        for i in lo..hi {
            let cell = LatticeCell::new(i, j);
            let corners = config.cell_corners(cell);
            if !reach.overlaps(&corners) {
                continue;
            }
            let points = corners.map(|p| warp.point(p));
            if !bounds.overlaps(&points) {
                continue;
            }
            let mid = config.cell_center(cell) + warp.offset();
            let h = config.field.elevation(mid, warp.time());
            let g = config.field.gradient(mid, warp.time());
            quads.push(Polygon {
                points: points.to_vec(),
                fill: shade(ramp_color(h, sea, amplitude), g).fade(TINT_ALPHA),
            });
        }
    }
    quads
}

/// Shoreline traced on a flat grid over the canvas, stitched, warped and
/// smoothed.
pub fn smooth_shoreline(config: &SceneConfig, warp: &Warp<'_>, resolution: usize) -> Vec<Path> {
    let grid = ContourGrid::new(cull_bounds(config.size), resolution, resolution);
    let segments = march(&grid, config.field.sea_level(), |p| warp.elevation(p));
    let lines = stitch(&segments, STITCH_TOLERANCE);
    debug!("shoreline: {} segments stitched into {} lines", segments.len(), lines.len());

    let stroke = Stroke::new(shore_stroke_color(config.hue), SHORE_WIDTH);
    lines
        .iter()
        .filter(|line| line.len() > 1)
        .map(|line| {
            let warped: Vec<DVec2> = line.iter().map(|&p| warp.point(p)).collect();
            Path {
                commands: smooth_path(&warped),
                fill: None,
                stroke: Some(stroke),
            }
        })
        .collect()
}

/// Shoreline as thin filled strips, one per contour segment of each lattice
/// cell. All strips share a single path.
pub fn strip_shoreline(config: &SceneConfig, warp: &Warp<'_>) -> Vec<Path> {
    let reach = reach_bounds(config, warp.offset());
    let sea = config.field.sea_level();
    let pad = config.basis.step() * STRIP_PAD;
    let lo = -config.lines + 1;
    let hi = config.lines - 1;

    let mut commands = Vec::new();
    for j in lo..hi {
        for i in lo..hi {
            let corners = config.cell_corners(LatticeCell::new(i, j));
            if !reach.overlaps(&corners) {
                continue;
            }
            let values = corners.map(|p| warp.elevation(p));
            for [a, b] in cell_segments(corners, values, sea) {
                let q = strip(warp.point(a), warp.point(b), pad);
                commands.push(PathCommand::MoveTo(q[0]));
                commands.extend(q[1..].iter().map(|&p| PathCommand::LineTo(p)));
                commands.push(PathCommand::Close);
            }
        }
    }
    if commands.is_empty() {
        return Vec::new();
    }
    vec![Path {
        commands,
        fill: Some(coast_color(config.hue)),
        stroke: None,
    }]
}

/// Faces of one building at the warp's instant.
///
/// `growth` scales the height and `opacity` the face alpha (both 1 for
/// still scenes). Returns `None` when the block is entirely off canvas.
pub fn building_block(
    config: &SceneConfig,
    warp: &Warp<'_>,
    index: usize,
    site: &BuildingSite,
    growth: f64,
    opacity: f64,
) -> Option<[Face; 5]> {
    let base = config.cell_corners(site.cell).map(|p| warp.point(p));
    let mid = warp.apply(config.cell_center(site.cell));
    let height = site.height(config.field.dryness(mid.height)) * growth;

    let mut extent = base.to_vec();
    extent.extend(base.iter().map(|p| DVec2::new(p.x, p.y - height)));
    if !cull_bounds(config.size).overlaps(&extent) {
        return None;
    }
    let style = BlockStyle {
        hue: site.hue,
        saturation: site.saturation,
        opacity,
    };
    Some(building_faces(index, base, height, style))
}

/// Centered, rounded viewing window with a dark border.
pub fn viewing_window(size: f64) -> Window {
    Window {
        center: DVec2::splat(size / 2.0),
        size: size * WINDOW_FRACTION,
        corner_radius: WINDOW_RADIUS,
        border: WINDOW_BORDER,
        border_color: Srgb {
            r: BORDER_GRAY,
            g: BORDER_GRAY,
            b: BORDER_GRAY,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TerrainParams;
    use tilemaker_core::Xorshift64;

    fn config(seed: u64) -> SceneConfig {
        SceneConfig::draw(600.0, &TerrainParams::city(), false, &mut Xorshift64::new(seed)).unwrap()
    }

    #[test]
    fn grid_has_two_line_families() {
        let c = config(3);
        let warp = c.warp(0.0, DVec2::ZERO);
        let lines = grid_lines(&c, &warp, 20);
        assert!(!lines.is_empty());
        let colors = grid_colors(c.hue);
        assert!(lines.iter().any(|p| p.stroke.map(|s| s.color) == Some(colors[0])));
        assert!(lines.iter().any(|p| p.stroke.map(|s| s.color) == Some(colors[1])));
        assert!(lines.iter().all(|p| p.commands.len() == 21));
    }

    #[test]
    fn water_quads_sit_on_low_cells() {
        let c = config(8);
        let warp = c.warp(0.0, DVec2::ZERO);
        let bounds = cull_bounds(c.size);
        for q in water_quads(&c, &warp, 2, WaterRule::NotAboveSea) {
            assert_eq!(q.points.len(), 4);
            assert!(bounds.overlaps(&q.points));
            assert_eq!(q.fill, water_color(c.hue));
        }
    }

    #[test]
    fn submerged_rule_is_stricter() {
        let c = config(21);
        let warp = c.warp(0.0, DVec2::ZERO);
        let loose = water_quads(&c, &warp, 1, WaterRule::NotAboveSea).len();
        let strict = water_quads(&c, &warp, 1, WaterRule::Submerged).len();
        assert!(strict <= loose);
    }

    #[test]
    fn ramp_is_clamped_at_both_ends() {
        assert_eq!(ramp_color(-1e6, 0.0, 10.0), Hsla::opaque(210.0, 70.0, 24.0));
        assert_eq!(ramp_color(1e6, 0.0, 10.0), Hsla::opaque(0.0, 0.0, 94.0));
        assert_eq!(ramp_color(0.0, 0.0, 10.0), Hsla::opaque(50.0, 80.0, 62.0));
        let mid = ramp_color(1.0, 0.0, 10.0);
        assert!((mid.h - 72.5).abs() < 1e-9);
    }

    #[test]
    fn uphill_toward_light_is_darker() {
        let base = Hsla::opaque(100.0, 50.0, 50.0);
        let toward = shade(base, DVec2::new(-1.0, -1.0));
        let away = shade(base, DVec2::new(1.0, 1.0));
        assert!(toward.l < away.l);
        assert_eq!(shade(base, DVec2::ZERO).l, 50.0);
    }

    #[test]
    fn shoreline_styles_both_produce_paths() {
        // Search a few seeds for a scene with a coast on canvas.
        let found = (0..40).map(config).find(|c| {
            let warp = c.warp(0.0, DVec2::ZERO);
            !smooth_shoreline(c, &warp, 60).is_empty() && !strip_shoreline(c, &warp).is_empty()
        });
        let Some(c) = found else {
            panic!("no coastline in 40 seeds");
        };
        let warp = c.warp(0.0, DVec2::ZERO);
        let smooth = smooth_shoreline(&c, &warp, 60);
        assert!(smooth.iter().all(|p| p.stroke.is_some() && p.fill.is_none()));
        assert!(smooth
            .iter()
            .all(|p| matches!(p.commands.first(), Some(PathCommand::MoveTo(_)))));
        let strips = strip_shoreline(&c, &warp);
        assert_eq!(strips.len(), 1);
        assert!(strips[0].commands.iter().any(|c| *c == PathCommand::Close));
    }

    #[test]
    fn zero_growth_gives_flat_block() {
        let c = config(4);
        let warp = c.warp(0.0, DVec2::ZERO);
        let site = BuildingSite {
            cell: LatticeCell::new(0, 0),
            hue: 30.0,
            saturation: 64.0,
            height_base: 50.0,
        };
        let faces = building_block(&c, &warp, 7, &site, 0.0, 1.0).unwrap();
        let roof = &faces[4];
        let base = c.cell_corners(site.cell).map(|p| warp.point(p));
        assert_eq!(roof.points, [base[1], base[2], base[3], base[0]]);
    }

    #[test]
    fn far_off_block_is_culled() {
        let c = config(4);
        let warp = c.warp(0.0, DVec2::ZERO);
        let site = BuildingSite {
            cell: LatticeCell::new(10_000, 10_000),
            hue: 30.0,
            saturation: 64.0,
            height_base: 50.0,
        };
        assert!(building_block(&c, &warp, 0, &site, 1.0, 1.0).is_none());
    }

    #[test]
    fn window_is_centered() {
        let w = viewing_window(900.0);
        assert_eq!(w.center, DVec2::new(450.0, 450.0));
        assert!((w.size - 774.0).abs() < 1e-9);
        assert_eq!(w.border_color.to_hex(), "#121212");
    }
}
