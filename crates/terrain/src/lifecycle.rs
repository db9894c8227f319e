//! Grow/sink state machine for animated building sites.
//!
//! A site targets `Land` while its ground sits clearly above sea and `Water`
//! while clearly below; inside the hysteresis band it keeps its previous
//! target, so a shoreline wobbling around sea level does not make buildings
//! flicker. Progress chases the target with a frame-rate independent
//! exponential approach.

/// What a site is heading toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupancy {
    #[default]
    Water,
    Land,
}

impl Occupancy {
    pub fn level(self) -> f64 {
        match self {
            Occupancy::Water => 0.0,
            Occupancy::Land => 1.0,
        }
    }
}

/// Approach rates in 1/seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleRates {
    pub build: f64,
    pub demolish: f64,
}

impl Default for LifecycleRates {
    fn default() -> Self {
        Self {
            build: 6.0,
            demolish: 4.0,
        }
    }
}

/// Faces of sites eased at or below this are skipped.
pub const VISIBILITY_THRESHOLD: f64 = 0.001;

/// `x²(3 − 2x)` on [0, 1].
pub fn smoothstep(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SiteLifecycle {
    target: Occupancy,
    progress: f64,
}

impl SiteLifecycle {
    /// A site that starts fully built (or fully sunk).
    pub fn settled(target: Occupancy) -> Self {
        Self {
            target,
            progress: target.level(),
        }
    }

    pub fn target(&self) -> Occupancy {
        self.target
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Retargets from the mid-cell height and advances progress by `dt`.
    pub fn update(&mut self, mid_height: f64, sea: f64, band: f64, rates: LifecycleRates, dt: f64) {
        if mid_height > sea + band {
            self.target = Occupancy::Land;
        } else if mid_height < sea - band {
            self.target = Occupancy::Water;
        }

        let goal = self.target.level();
        let rate = if goal > self.progress {
            rates.build
        } else {
            rates.demolish
        };
        let dt = dt.max(0.0);
        self.progress = (self.progress + (goal - self.progress) * (1.0 - (-rate * dt).exp())).clamp(0.0, 1.0);
    }

    /// Smoothstepped progress; scales height and opacity.
    pub fn eased(&self) -> f64 {
        smoothstep(self.progress)
    }

    pub fn is_visible(&self) -> bool {
        self.eased() > VISIBILITY_THRESHOLD
    }
}
