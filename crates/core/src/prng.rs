//! Random sources for scene generation.
//!
//! Scene code only ever asks for uniform draws in [0, 1) through the
//! [`RandomSource`] trait. [`Xorshift64`] is the deterministic implementation
//! used everywhere: the same seed always yields the same scene.

/// A uniform random source producing values in [0, 1).
///
/// Object-safe so placement models can take `&mut dyn RandomSource`.
pub trait RandomSource {
    /// Next uniform value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform value in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform index in [0, max). Returns 0 when `max` is 0.
    fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_f64() * max as f64) as usize).min(max - 1)
    }
}

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of xorshift and is replaced by a non-zero fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of the state over 2^53, so the result is never 1.0.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// In-place Fisher–Yates shuffle driven by `rng`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
