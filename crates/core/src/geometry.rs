//! Small 2D helpers on top of [`glam::DVec2`].

pub use glam::DVec2;

/// Substitute for a zero denominator, so interpolation between two equal
/// samples degrades to a skipped or degenerate segment instead of NaN.
pub const EPSILON: f64 = 1e-6;

/// Linear interpolation between two points.
pub fn lerp_point(a: DVec2, b: DVec2, t: f64) -> DVec2 {
    a + (b - a) * t
}

/// `numerator / denominator`, with a zero denominator replaced by [`EPSILON`].
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    let d = if denominator == 0.0 { EPSILON } else { denominator };
    numerator / d
}

/// Unit vector in the direction of `v`; a zero vector is returned unchanged.
pub fn normalize_or_self(v: DVec2) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        v
    } else {
        v / len
    }
}

/// Left-hand perpendicular `(-y, x)`.
pub fn perpendicular(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

/// Mean of the y coordinates; 0 for an empty slice.
pub fn mean_y(points: &[DVec2]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
}

/// Unit vector at `degrees` from the +x axis (screen space, y down).
pub fn from_angle_deg(degrees: f64) -> DVec2 {
    let r = degrees.to_radians();
    DVec2::new(r.cos(), r.sin())
}

/// Axis-aligned rectangle used for culling and contour sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Square `[0, size]²` grown by `margin` on every side.
    pub fn square(size: f64, margin: f64) -> Self {
        Self {
            min: DVec2::splat(-margin),
            max: DVec2::splat(size + margin),
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// True when the bounding box of `points` intersects this rectangle.
    pub fn overlaps(&self, points: &[DVec2]) -> bool {
        let Some(first) = points.first() else {
            return false;
        };
        let (lo, hi) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        lo.x <= self.max.x && hi.x >= self.min.x && lo.y <= self.max.y && hi.y >= self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_ratio_substitutes_epsilon() {
        assert_eq!(safe_ratio(1.0, 0.0), 1.0 / EPSILON);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }

    #[test]
    fn normalize_or_self_leaves_zero_vector() {
        assert_eq!(normalize_or_self(DVec2::ZERO), DVec2::ZERO);
        let n = normalize_or_self(DVec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        let v = DVec2::new(0.3, -1.7);
        assert!(v.dot(perpendicular(v)).abs() < 1e-12);
    }

    #[test]
    fn mean_y_of_empty_is_zero() {
        assert_eq!(mean_y(&[]), 0.0);
        assert_eq!(mean_y(&[DVec2::new(0.0, 2.0), DVec2::new(5.0, 4.0)]), 3.0);
    }

    #[test]
    fn bounds_overlap_detects_partial_intersection() {
        let b = Bounds::square(100.0, 0.0);
        assert!(b.overlaps(&[DVec2::new(-10.0, -10.0), DVec2::new(5.0, 5.0)]));
        assert!(!b.overlaps(&[DVec2::new(-10.0, -10.0), DVec2::new(-5.0, -1.0)]));
        assert!(!b.overlaps(&[]));
        assert!(b.contains(DVec2::new(100.0, 0.0)));
    }
}
