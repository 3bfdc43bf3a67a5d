//! Seeded linear congruential sequence shared by every random decision in a generation run.
//!
//! The constants are part of the reproducibility contract: changing them changes every
//! generated graph for every seed.

const MULTIPLIER: u64 = 1_664_525;
const INCREMENT: u64 = 1_013_904_223;
const MODULUS: u64 = 1 << 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Only the low 32 bits of `seed` are significant.
    pub fn new(seed: u64) -> Self {
        Self { state: (seed % MODULUS) as u32 }
    }

    pub fn next_u32(&mut self) -> u32 {
        let next = (u64::from(self.state) * MULTIPLIER + INCREMENT) % MODULUS;
        self.state = next as u32;
        self.state
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / MODULUS as f64
    }

    /// Uniform integer in the inclusive range `[min, max]`. Always advances the sequence once;
    /// a degenerate range yields `min`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        let sample = u128::from(self.next_u32());
        if max <= min {
            return min;
        }
        let span = (i128::from(max) - i128::from(min) + 1) as u128;
        min + ((sample * span) >> 32) as i64
    }

    /// Uniform index into a collection of `len` items, `None` without advancing when empty.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.range(0, len as i64 - 1) as usize)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).map(|index| &items[index])
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}
