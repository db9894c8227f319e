//! Closed-form terrain height field.
//!
//! Elevation is the sum of two tilted sine waves with a 0.6 / 0.4 weight
//! split, scaled by a global amplitude proportional to the lattice step. The
//! gradient is the analytic derivative, so warping never needs finite
//! differences. Animated scenes add `ω·t` inside every argument, with `ω` an
//! integer number of turns per loop, which makes the loop exact.

use std::f64::consts::TAU;

use tilemaker_core::geometry::{from_angle_deg, perpendicular};
use tilemaker_core::prng::RandomSource;
use tilemaker_core::DVec2;

/// Component weights; they sum to 1 so |z| ≤ amplitude.
const WEIGHTS: [f64; 2] = [0.6, 0.4];
/// Amplitude as a multiple of the lattice step.
const AMPLITUDE_PER_STEP: (f64, f64) = (1.8, 4.2);
const FREQUENCY_1: (f64, f64) = (0.004, 0.008);
const FREQUENCY_2: (f64, f64) = (0.006, 0.010);
/// Dryness saturates at this fraction of the amplitude above sea level.
const DRYNESS_SPAN: f64 = 0.9;

/// One sine wave travelling along `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveComponent {
    pub normal: DVec2,
    pub frequency: f64,
    pub weight: f64,
    /// Radians per second added to the argument.
    pub angular_speed: f64,
}

impl WaveComponent {
    pub fn new(direction_deg: f64, frequency: f64, weight: f64) -> Self {
        Self {
            normal: from_angle_deg(direction_deg),
            frequency,
            weight,
            angular_speed: 0.0,
        }
    }

    /// Direction the lateral warp pushes along.
    pub fn perpendicular(&self) -> DVec2 {
        perpendicular(self.normal)
    }

    fn argument(&self, p: DVec2, t: f64) -> f64 {
        p.dot(self.normal) * self.frequency + self.angular_speed * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightField {
    amplitude: f64,
    sea_level: f64,
    components: [WaveComponent; 2],
}

impl HeightField {
    /// Builds a field with sea level at `-sea_fraction · amplitude`.
    pub fn new(amplitude: f64, sea_fraction: f64, components: [WaveComponent; 2]) -> Self {
        Self {
            amplitude,
            sea_level: -sea_fraction * amplitude,
            components,
        }
    }

    /// Draws amplitude, frequencies and wave directions for a lattice `step`.
    pub fn draw(step: f64, sea_fraction: f64, rng: &mut dyn RandomSource) -> Self {
        let amplitude = step * rng.next_range(AMPLITUDE_PER_STEP.0, AMPLITUDE_PER_STEP.1);
        let f1 = rng.next_range(FREQUENCY_1.0, FREQUENCY_1.1);
        let f2 = rng.next_range(FREQUENCY_2.0, FREQUENCY_2.1);
        let th1 = rng.next_range(0.0, 360.0);
        let th2 = rng.next_range(0.0, 360.0);
        Self::new(
            amplitude,
            sea_fraction,
            [
                WaveComponent::new(th1, f1, WEIGHTS[0]),
                WaveComponent::new(th2, f2, WEIGHTS[1]),
            ],
        )
    }

    /// Animates component `k` by `cycles[k]` whole turns per `period` seconds.
    pub fn with_loop(mut self, period: f64, cycles: [u32; 2]) -> Self {
        for (c, m) in self.components.iter_mut().zip(cycles) {
            c.angular_speed = if period > 0.0 {
                TAU * m as f64 / period
            } else {
                0.0
            };
        }
        self
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }

    pub fn components(&self) -> &[WaveComponent; 2] {
        &self.components
    }

    /// Elevation at world point `p` and time `t`.
    pub fn elevation(&self, p: DVec2, t: f64) -> f64 {
        self.amplitude
            * self
                .components
                .iter()
                .map(|c| c.weight * c.argument(p, t).sin())
                .sum::<f64>()
    }

    /// Directional derivative of each component along its own normal.
    pub fn slopes(&self, p: DVec2, t: f64) -> [f64; 2] {
        let [a, b] = &self.components;
        [self.slope(a, p, t), self.slope(b, p, t)]
    }

    fn slope(&self, c: &WaveComponent, p: DVec2, t: f64) -> f64 {
        self.amplitude * c.weight * c.frequency * c.argument(p, t).cos()
    }

    /// Analytic gradient `Σ d_k · n_k`.
    pub fn gradient(&self, p: DVec2, t: f64) -> DVec2 {
        let d = self.slopes(p, t);
        self.components
            .iter()
            .zip(d)
            .map(|(c, dk)| c.normal * dk)
            .sum()
    }

    /// Strict: an elevation equal to sea level is not above it.
    pub fn is_above_sea(&self, h: f64) -> bool {
        h > self.sea_level
    }

    /// Height above sea normalized to [0, 1].
    pub fn dryness(&self, h: f64) -> f64 {
        ((h - self.sea_level) / (self.amplitude * DRYNESS_SPAN)).clamp(0.0, 1.0)
    }
}
