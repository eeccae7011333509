//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! The generator is the sole source of randomness in a run: noise synthesis
//! draws the base white-noise grid from it, then particle placement draws
//! start points. It is passed by `&mut` through each call chain, never shared,
//! so the draw order (and therefore the output) is fixed for a given seed.
//!
//! Wide draws are built from two 32-bit halves, each taken from the high bits
//! of one xorshift step, so `next_u64` advances the state twice.

use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced with
/// a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// 2^53, the number of representable steps in an f64 mantissa.
    const MANTISSA_STEPS: f64 = (1u64 << 53) as f64;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    fn advance(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns the next 32-bit draw (high half of one state advance).
    pub fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    /// Returns the next 64-bit value, concatenated from two 32-bit draws.
    ///
    /// The first draw fills the low half, the second the high half.
    pub fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        low | (high << 32)
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / Self::MANTISSA_STEPS
    }

    /// Returns a uniformly distributed f64 in the closed interval [0, 1].
    pub fn next_f64_inclusive(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (Self::MANTISSA_STEPS - 1.0)
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        let v = min + self.next_f64() * (max - min);
        // Rounding in the affine map can land exactly on `max`.
        if v >= max && max > min {
            min.max(max - (max - min) * f64::EPSILON)
        } else {
            v
        }
    }
}
