//! Oblique lattice basis.
//!
//! Two non-parallel step vectors `g1`, `g2` define the lattice that grid
//! lines, terrain sampling, and building footprints are laid out on.

use tilemaker_core::geometry::from_angle_deg;
use tilemaker_core::prng::RandomSource;
use tilemaker_core::DVec2;

/// Base angle range in degrees.
const BASE_ANGLE: (f64, f64) = (5.0, 25.0);
/// Separation between the two basis angles, in degrees. Excludes 0° and 180°
/// by a wide margin so the basis is always well conditioned.
const SEPARATION: (f64, f64) = (110.0, 140.0);
/// Lattice step length range before rounding.
const STEP: (f64, f64) = (10.0, 60.0);

/// Integer lattice coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeCell {
    pub i: i32,
    pub j: i32,
}

impl LatticeCell {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// The cell and its three neighbours toward +i and +j, in the order
    /// (i,j), (i+1,j), (i,j+1), (i+1,j+1).
    pub fn block(self) -> [LatticeCell; 4] {
        [
            self,
            LatticeCell::new(self.i + 1, self.j),
            LatticeCell::new(self.i, self.j + 1),
            LatticeCell::new(self.i + 1, self.j + 1),
        ]
    }
}

/// Two lattice step vectors and the values that generated them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    g1: DVec2,
    g2: DVec2,
    step: f64,
    angles: (f64, f64),
}

impl Basis {
    /// Draws base angle, separation and step from `rng`.
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let step = rng.next_range(STEP.0, STEP.1).round();
        let a1 = rng.next_range(BASE_ANGLE.0, BASE_ANGLE.1);
        let a2 = a1 + rng.next_range(SEPARATION.0, SEPARATION.1);
        Self::from_angles(a1, a2, step)
    }

    /// Builds a basis from explicit angles (degrees) and step length.
    pub fn from_angles(a1: f64, a2: f64, step: f64) -> Self {
        Self {
            g1: from_angle_deg(a1) * step,
            g2: from_angle_deg(a2) * step,
            step,
            angles: (a1, a2),
        }
    }

    pub fn g1(&self) -> DVec2 {
        self.g1
    }

    pub fn g2(&self) -> DVec2 {
        self.g2
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Generating angles in degrees.
    pub fn angles(&self) -> (f64, f64) {
        self.angles
    }

    /// `g1 × g2`; zero only for a degenerate (parallel) basis.
    pub fn determinant(&self) -> f64 {
        self.g1.perp_dot(self.g2)
    }

    /// Flat-space point `origin + i·g1 + j·g2`. Fractional coordinates allowed.
    pub fn lattice_point(&self, origin: DVec2, i: f64, j: f64) -> DVec2 {
        origin + self.g1 * i + self.g2 * j
    }

    /// Corners of a cell in the order (0,0), (1,0), (1,1), (0,1).
    pub fn cell_corners(&self, origin: DVec2, cell: LatticeCell) -> [DVec2; 4] {
        let (i, j) = (cell.i as f64, cell.j as f64);
        [
            self.lattice_point(origin, i, j),
            self.lattice_point(origin, i + 1.0, j),
            self.lattice_point(origin, i + 1.0, j + 1.0),
            self.lattice_point(origin, i, j + 1.0),
        ]
    }

    pub fn cell_center(&self, origin: DVec2, cell: LatticeCell) -> DVec2 {
        self.lattice_point(origin, cell.i as f64 + 0.5, cell.j as f64 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemaker_core::Xorshift64;

    #[test]
    fn from_angles_scales_unit_vectors_by_step() {
        let b = Basis::from_angles(10.0, 125.0, 30.0);
        assert!((b.g1().length() - 30.0).abs() < 1e-9);
        assert!((b.g2().length() - 30.0).abs() < 1e-9);
        assert_eq!(b.angles(), (10.0, 125.0));
    }

    #[test]
    fn cell_corners_follow_basis() {
        let b = Basis::from_angles(0.0, 90.0, 10.0);
        let corners = b.cell_corners(DVec2::ZERO, LatticeCell::new(1, 2));
        assert!((corners[0] - DVec2::new(10.0, 20.0)).length() < 1e-9);
        assert!((corners[1] - DVec2::new(20.0, 20.0)).length() < 1e-9);
        assert!((corners[2] - DVec2::new(20.0, 30.0)).length() < 1e-9);
        assert!((corners[3] - DVec2::new(10.0, 30.0)).length() < 1e-9);
        let center = b.cell_center(DVec2::ZERO, LatticeCell::new(1, 2));
        assert!((center - DVec2::new(15.0, 25.0)).length() < 1e-9);
    }

    #[test]
    fn block_lists_claimed_neighbours() {
        let block = LatticeCell::new(0, 0).block();
        assert_eq!(
            block,
            [
                LatticeCell::new(0, 0),
                LatticeCell::new(1, 0),
                LatticeCell::new(0, 1),
                LatticeCell::new(1, 1)
            ]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drawn_basis_is_never_degenerate(seed: u64) {
                let b = Basis::draw(&mut Xorshift64::new(seed));
                let (a1, a2) = b.angles();
                prop_assert!((5.0..25.0).contains(&a1));
                prop_assert!((110.0..140.0).contains(&(a2 - a1)));
                prop_assert!((10.0..=60.0).contains(&b.step()));
                // sin(110°..140°) > 0.64, so |det| > 0.6·step².
                prop_assert!(b.determinant().abs() > 0.6 * b.step() * b.step());
            }
        }
    }
}
