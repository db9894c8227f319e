//! Sea-level classification and shoreline contouring.
//!
//! The shoreline is traced with marching squares on a regular flat grid that
//! is independent of the lattice, stitched into polylines by shared
//! endpoints, then warped and smoothed into quadratic paths.
//!
//! Corner order everywhere is (0,0), (1,0), (1,1), (0,1) and edge `k` joins
//! corner `k` to corner `k + 1 (mod 4)`.

use std::collections::{HashMap, VecDeque};

use tilemaker_core::frame::PathCommand;
use tilemaker_core::geometry::{lerp_point, normalize_or_self, safe_ratio, Bounds};
use tilemaker_core::DVec2;

/// A straight contour piece inside one grid cell.
pub type Segment = [DVec2; 2];

/// Default stitching tolerance in flat-space units.
pub const STITCH_TOLERANCE: f64 = 1e-2;

/// True iff every corner elevation is strictly above `sea_level`.
pub fn cell_above_sea(corner_heights: [f64; 4], sea_level: f64) -> bool {
    corner_heights.iter().all(|&h| h > sea_level)
}

/// True iff every corner elevation is strictly below `sea_level`.
pub fn cell_submerged(corner_heights: [f64; 4], sea_level: f64) -> bool {
    corner_heights.iter().all(|&h| h < sea_level)
}

/// 4-bit corner code: bit `k` is set when corner `k` is above `level`.
pub fn cell_code(values: [f64; 4], level: f64) -> u8 {
    values
        .iter()
        .enumerate()
        .fold(0u8, |code, (k, &v)| if v > level { code | (1 << k) } else { code })
}

/// Edge pairs to connect for each code. Saddles (5, 10) get two independent
/// segments instead of a center-sample decision.
pub fn edge_pairs(code: u8) -> &'static [(usize, usize)] {
    match code {
        1 | 14 => &[(3, 0)],
        2 | 13 => &[(0, 1)],
        3 | 12 => &[(3, 1)],
        4 | 11 => &[(1, 2)],
        5 => &[(0, 1), (3, 2)],
        6 | 9 => &[(0, 2)],
        7 | 8 => &[(2, 3)],
        10 => &[(0, 3), (1, 2)],
        _ => &[],
    }
}

/// Contour segments for one cell.
pub fn cell_segments(corners: [DVec2; 4], values: [f64; 4], level: f64) -> Vec<Segment> {
    let code = cell_code(values, level);
    let crossing = |edge: usize| {
        let (a, b) = (edge, (edge + 1) % 4);
        let t = safe_ratio(level - values[a], values[b] - values[a]);
        lerp_point(corners[a], corners[b], t)
    };
    edge_pairs(code)
        .iter()
        .map(|&(e1, e2)| [crossing(e1), crossing(e2)])
        .collect()
}

/// Regular sampling grid over a flat-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourGrid {
    pub bounds: Bounds,
    pub nx: usize,
    pub ny: usize,
}

impl ContourGrid {
    pub fn new(bounds: Bounds, nx: usize, ny: usize) -> Self {
        Self {
            bounds,
            nx: nx.max(1),
            ny: ny.max(1),
        }
    }

    fn node(&self, ix: usize, iy: usize) -> DVec2 {
        let size = self.bounds.max - self.bounds.min;
        self.bounds.min
            + DVec2::new(
                size.x * ix as f64 / self.nx as f64,
                size.y * iy as f64 / self.ny as f64,
            )
    }
}

/// Marches `grid`, sampling `sample` once per node.
pub fn march(grid: &ContourGrid, level: f64, sample: impl Fn(DVec2) -> f64) -> Vec<Segment> {
    let stride = grid.nx + 1;
    let values: Vec<f64> = (0..=grid.ny)
        .flat_map(|iy| (0..=grid.nx).map(move |ix| (ix, iy)))
        .map(|(ix, iy)| sample(grid.node(ix, iy)))
        .collect();

    let mut segments = Vec::new();
    for iy in 0..grid.ny {
        for ix in 0..grid.nx {
            let v = [
                values[iy * stride + ix],
                values[iy * stride + ix + 1],
                values[(iy + 1) * stride + ix + 1],
                values[(iy + 1) * stride + ix],
            ];
            let code = cell_code(v, level);
            if code == 0 || code == 15 {
                continue;
            }
            let corners = [
                grid.node(ix, iy),
                grid.node(ix + 1, iy),
                grid.node(ix + 1, iy + 1),
                grid.node(ix, iy + 1),
            ];
            segments.extend(cell_segments(corners, v, level));
        }
    }
    segments
}

type Key = (i64, i64);

fn key(p: DVec2, eps: f64) -> Key {
    ((p.x / eps).round() as i64, (p.y / eps).round() as i64)
}

fn close(a: DVec2, b: DVec2, eps: f64) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

/// Finds an unused segment touching `end` and returns its far endpoint.
fn take_neighbor(
    end: DVec2,
    segments: &[Segment],
    index: &HashMap<Key, Vec<usize>>,
    used: &mut [bool],
    eps: f64,
) -> Option<DVec2> {
    let (kx, ky) = key(end, eps);
    for dx in -1..=1 {
        for dy in -1..=1 {
            let Some(candidates) = index.get(&(kx + dx, ky + dy)) else {
                continue;
            };
            for &idx in candidates {
                if used[idx] {
                    continue;
                }
                let [a, b] = segments[idx];
                let far = if close(a, end, eps) {
                    b
                } else if close(b, end, eps) {
                    a
                } else {
                    continue;
                };
                used[idx] = true;
                return Some(far);
            }
        }
    }
    None
}

/// Joins segments sharing endpoints (within `eps`) into polylines.
pub fn stitch(segments: &[Segment], eps: f64) -> Vec<Vec<DVec2>> {
    let eps = if eps > 0.0 { eps } else { STITCH_TOLERANCE };
    let mut index: HashMap<Key, Vec<usize>> = HashMap::new();
    for (idx, s) in segments.iter().enumerate() {
        index.entry(key(s[0], eps)).or_default().push(idx);
        index.entry(key(s[1], eps)).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let mut lines = Vec::new();
    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut line: VecDeque<DVec2> = VecDeque::from(segments[i].to_vec());
        loop {
            let tail = line[line.len() - 1];
            if let Some(next) = take_neighbor(tail, segments, &index, &mut used, eps) {
                line.push_back(next);
                continue;
            }
            if let Some(prev) = take_neighbor(line[0], segments, &index, &mut used, eps) {
                line.push_front(prev);
                continue;
            }
            break;
        }
        lines.push(line.into_iter().collect());
    }
    lines
}

/// Quadratic smoothing of an already-warped polyline: each interior vertex is
/// a control point ending at `(p[i-1] + 2·p[i] + p[i+1]) / 4`, and the path
/// ends with a smooth quadratic to the last vertex.
pub fn smooth_path(points: &[DVec2]) -> Vec<PathCommand> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut commands = vec![PathCommand::MoveTo(points[0])];
    for w in points.windows(3) {
        let mid = (w[0] + w[1] * 2.0 + w[2]) / 4.0;
        commands.push(PathCommand::QuadTo { ctrl: w[1], to: mid });
    }
    commands.push(PathCommand::SmoothQuadTo(points[points.len() - 1]));
    commands
}

/// Thin quad along `a → b`, offset by `pad` along the segment normal.
pub fn strip(a: DVec2, b: DVec2, pad: f64) -> [DVec2; 4] {
    let n = normalize_or_self(DVec2::new(b.y - a.y, -(b.x - a.x))) * pad;
    [a, b, b + n, a + n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_corners() -> [DVec2; 4] {
        [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]
    }

    fn values_for(code: u8) -> [f64; 4] {
        let mut v = [-1.0; 4];
        for (k, slot) in v.iter_mut().enumerate() {
            if code & (1 << k) != 0 {
                *slot = 1.0;
            }
        }
        v
    }

    #[test]
    fn uniform_cells_emit_nothing() {
        assert!(cell_segments(unit_corners(), values_for(0), 0.0).is_empty());
        assert!(cell_segments(unit_corners(), values_for(15), 0.0).is_empty());
    }

    #[test]
    fn every_mixed_code_emits_segments_on_sign_changing_edges() {
        for code in 1u8..15 {
            let values = values_for(code);
            let segs = cell_segments(unit_corners(), values, 0.0);
            let expected = if code == 5 || code == 10 { 2 } else { 1 };
            assert_eq!(segs.len(), expected, "code {code}");
            for s in &segs {
                for p in s {
                    let on_edge = p.x.abs() < 1e-12
                        || (p.x - 1.0).abs() < 1e-12
                        || p.y.abs() < 1e-12
                        || (p.y - 1.0).abs() < 1e-12;
                    assert!(on_edge, "code {code}: {p:?} not on the cell boundary");
                    assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
                }
            }
        }
    }

    #[test]
    fn code_bits_follow_corner_order() {
        assert_eq!(cell_code([1.0, -1.0, -1.0, -1.0], 0.0), 1);
        assert_eq!(cell_code([-1.0, 1.0, -1.0, -1.0], 0.0), 2);
        assert_eq!(cell_code([-1.0, -1.0, 1.0, -1.0], 0.0), 4);
        assert_eq!(cell_code([-1.0, -1.0, -1.0, 1.0], 0.0), 8);
        // Equal to level counts as below.
        assert_eq!(cell_code([0.0, 0.0, 0.0, 0.0], 0.0), 0);
    }

    #[test]
    fn crossing_is_linearly_interpolated() {
        let segs = cell_segments(unit_corners(), [3.0, -1.0, -1.0, -1.0], 0.0);
        // Edge 3 runs corner 3 → corner 0, edge 0 runs corner 0 → corner 1.
        let [a, b] = segs[0];
        assert!((a - DVec2::new(0.0, 0.75)).length() < 1e-12, "{a:?}");
        assert!((b - DVec2::new(0.75, 0.0)).length() < 1e-12, "{b:?}");
    }

    #[test]
    fn above_sea_is_strict() {
        assert!(cell_above_sea([1.0, 2.0, 3.0, 4.0], 0.5));
        assert!(!cell_above_sea([-0.8, 2.0, 3.0, 4.0], -0.8));
        assert!(cell_submerged([-2.0, -2.0, -2.0, -2.0], -0.8));
        assert!(!cell_submerged([-0.8, -2.0, -2.0, -2.0], -0.8));
    }

    #[test]
    fn march_circle_stitches_into_one_closed_loop() {
        let grid = ContourGrid::new(
            Bounds {
                min: DVec2::splat(-2.0),
                max: DVec2::splat(2.0),
            },
            40,
            40,
        );
        let center = DVec2::new(0.013, 0.021);
        let segs = march(&grid, 0.0, |p| 1.0 - (p - center).length());
        assert!(!segs.is_empty());
        let lines = stitch(&segs, 1e-6);
        assert_eq!(lines.len(), 1, "expected one loop, got {}", lines.len());
        let line = &lines[0];
        assert_eq!(line.len(), segs.len() + 1);
        assert!((line[0] - line[line.len() - 1]).length() < 1e-6);
        for p in line {
            let r = (*p - center).length();
            assert!((r - 1.0).abs() < 0.05, "{p:?} far from the unit circle");
        }
    }

    #[test]
    fn march_emits_at_least_one_segment_per_mixed_cell() {
        let grid = ContourGrid::new(Bounds::square(10.0, 0.0), 10, 10);
        let field = |p: DVec2| (p.x * 0.7).sin() + (p.y * 0.4).cos();
        let segs = march(&grid, 0.2, field);
        let mut mixed = 0;
        for iy in 0..10 {
            for ix in 0..10 {
                let (x, y) = (ix as f64, iy as f64);
                let v = [
                    field(DVec2::new(x, y)),
                    field(DVec2::new(x + 1.0, y)),
                    field(DVec2::new(x + 1.0, y + 1.0)),
                    field(DVec2::new(x, y + 1.0)),
                ];
                let code = cell_code(v, 0.2);
                if code != 0 && code != 15 {
                    mixed += 1;
                }
            }
        }
        assert!(mixed > 0);
        assert!(segs.len() >= mixed);
    }

    #[test]
    fn smooth_path_shape() {
        let pts = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
        ];
        let cmds = smooth_path(&pts);
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], PathCommand::MoveTo(pts[0]));
        assert_eq!(
            cmds[1],
            PathCommand::QuadTo {
                ctrl: pts[1],
                to: DVec2::new(3.0, 1.0)
            }
        );
        assert_eq!(cmds[2], PathCommand::SmoothQuadTo(pts[2]));
        assert!(smooth_path(&pts[..1]).is_empty());
    }

    #[test]
    fn strip_is_offset_by_pad() {
        let q = strip(DVec2::ZERO, DVec2::new(10.0, 0.0), 2.0);
        assert_eq!(q[2], DVec2::new(10.0, -2.0));
        assert_eq!(q[3], DVec2::new(0.0, -2.0));
    }

    mod proptests {
        use super::*;
        use crate::basis::{Basis, LatticeCell};
        use crate::height::HeightField;
        use proptest::prelude::*;
        use tilemaker_core::Xorshift64;

        proptest! {
            #[test]
            fn above_sea_iff_every_corner_is_strictly_higher(
                amplitude in 0.5_f64..200.0,
                frac in -0.3_f64..0.3,
                u in prop::array::uniform4(-1.0_f64..1.0),
                pin in prop::option::of(0_usize..4),
            ) {
                let sea = -frac * amplitude;
                let mut heights = u.map(|x| x * amplitude);
                if let Some(k) = pin {
                    heights[k] = sea;
                }
                let above = cell_above_sea(heights, sea);
                prop_assert_eq!(above, heights.iter().all(|&h| h > sea));
                if pin.is_some() {
                    prop_assert!(!above);
                }
                prop_assert!(!(above && cell_submerged(heights, sea)));
            }

            #[test]
            fn drawn_terrain_cells_above_sea_have_dry_corners(
                seed: u64,
                frac in 0.0_f64..0.2,
                i in -20_i32..20,
                j in -20_i32..20,
            ) {
                let mut rng = Xorshift64::new(seed);
                let basis = Basis::draw(&mut rng);
                let field = HeightField::draw(basis.step(), frac, &mut rng);
                let origin = DVec2::new(450.0, 450.0);
                let heights = basis
                    .cell_corners(origin, LatticeCell::new(i, j))
                    .map(|p| field.elevation(p, 0.0));
                if cell_above_sea(heights, field.sea_level()) {
                    for h in heights {
                        prop_assert!(h > field.sea_level());
                    }
                }
            }
        }
    }
}
