//! RNG module - injectable randomness for spawns, grants and garbage
//!
//! Every random draw in the core goes through [`RandomSource`], so callers
//! decide where entropy comes from:
//!
//! - [`SimpleRng`]: small LCG, deterministic per seed (replays, benches)
//! - [`SequenceRng`]: scripted outcomes for tests
//! - `fastrand::Rng`: entropy-seeded play

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Multiply-shift keeps the high bits, which are the good ones for an LCG.
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Generate random value in range [min, max]. `max` below `min` is treated as `min`.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let max = max.max(min);
        let span = max - min;
        if span == u32::MAX {
            return self.next_u32();
        }
        min + self.next_range(span + 1)
    }

    /// True with the given probability in percent.
    fn chance_percent(&mut self, percent: u32) -> bool {
        self.next_range(100) < percent
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state; feeding it back to `new` resumes the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Scripted random source.
///
/// Each value is used as the outcome of the next draw, reduced modulo the
/// requested range; the script repeats once exhausted. An empty script always
/// yields 0.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    pos: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    fn advance(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.advance() % max
    }
}

impl RandomSource for fastrand::Rng {
    fn next_u32(&mut self) -> u32 {
        self.u32(..)
    }

    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.u32(0..max)
    }
}
