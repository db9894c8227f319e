//! Surface warp: flat lattice space to screen space.
//!
//! A flat point is lifted by its elevation and pushed sideways along the
//! wave perpendiculars by its slopes, which turns a flat oblique mesh into
//! rolling terrain.

use tilemaker_core::DVec2;

use crate::height::HeightField;

/// Lateral skew gain.
pub const DEFAULT_LATERAL: f64 = 0.9;
/// Vertical lift gain.
pub const DEFAULT_VERTICAL: f64 = 1.0;

/// A screen point together with the elevation it was lifted by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpedPoint {
    pub screen: DVec2,
    pub height: f64,
}

/// Warp evaluated at a fixed time and lattice slide offset.
#[derive(Debug, Clone, Copy)]
pub struct Warp<'a> {
    field: &'a HeightField,
    lateral: f64,
    vertical: f64,
    time: f64,
    offset: DVec2,
}

impl<'a> Warp<'a> {
    pub fn new(field: &'a HeightField, lateral: f64, vertical: f64) -> Self {
        Self {
            field,
            lateral,
            vertical,
            time: 0.0,
            offset: DVec2::ZERO,
        }
    }

    pub fn at_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Slides every flat point by `offset` before warping.
    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn field(&self) -> &HeightField {
        self.field
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    /// Elevation under flat point `p` (after the slide offset).
    pub fn elevation(&self, p: DVec2) -> f64 {
        self.field.elevation(p + self.offset, self.time)
    }

    pub fn apply(&self, p: DVec2) -> WarpedPoint {
        let q = p + self.offset;
        let height = self.field.elevation(q, self.time);
        let slopes = self.field.slopes(q, self.time);
        let skew: f64 = self
            .field
            .components()
            .iter()
            .zip(slopes)
            .map(|(c, d)| d * c.perpendicular().x)
            .sum();
        WarpedPoint {
            screen: DVec2::new(q.x + self.lateral * skew, q.y - self.vertical * height),
            height,
        }
    }

    pub fn point(&self, p: DVec2) -> DVec2 {
        self.apply(p).screen
    }
}
