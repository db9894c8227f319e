//! Extruded building faces and painter's-algorithm ordering.
//!
//! Each building is five quads sharing one hue. Faces from every building go
//! into a single list that is stably sorted by depth key, so painting in list
//! order draws far faces first.

use tilemaker_core::geometry::mean_y;
use tilemaker_core::{DVec2, Face, FaceKind, Hsla};

/// Fixed (hue offset, lightness) per face: roof brightest, back darkest.
pub fn shading(kind: FaceKind) -> (f64, f64) {
    match kind {
        FaceKind::Left => (0.0, 38.0),
        FaceKind::Right => (8.0, 46.0),
        FaceKind::Front => (4.0, 34.0),
        FaceKind::Back => (-6.0, 30.0),
        FaceKind::Roof => (2.0, 72.0),
    }
}

/// Style shared by the five faces of one building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub hue: f64,
    pub saturation: f64,
    /// Multiplies every face's alpha.
    pub opacity: f64,
}

impl BlockStyle {
    pub fn fill(&self, kind: FaceKind) -> Hsla {
        let (dh, l) = shading(kind);
        Hsla::new(self.hue + dh, self.saturation, l, 1.0).fade(self.opacity)
    }
}

/// Builds the five faces of a block standing on warped base corners
/// `[P00, P10, P11, P01]` and rising `height` screen units.
pub fn building_faces(site: usize, base: [DVec2; 4], height: f64, style: BlockStyle) -> [Face; 5] {
    let [p00, p10, p11, p01] = base;
    let up = DVec2::new(0.0, -height);
    let (t00, t10, t11, t01) = (p00 + up, p10 + up, p11 + up, p01 + up);

    let face = |kind: FaceKind, points: [DVec2; 4], depth: f64| Face {
        site,
        kind,
        points,
        fill: style.fill(kind),
        depth,
    };

    [
        face(FaceKind::Left, [t00, t01, p01, p00], mean_y(&[p00, p01])),
        face(FaceKind::Right, [t10, t11, p11, p10], mean_y(&[p10, p11])),
        face(FaceKind::Front, [t10, t00, p00, p10], mean_y(&[p00, p10])),
        face(FaceKind::Back, [t11, t01, p01, p11], mean_y(&[p01, p11])),
        face(FaceKind::Roof, [t10, t11, t01, t00], mean_y(&[t00, t10, t11, t01])),
    ]
}

/// Stable ascending sort by depth key. NaN keys sort last.
pub fn sort_by_depth(faces: &mut [Face]) {
    faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}
