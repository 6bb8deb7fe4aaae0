//! Randomness seam for the simulator.
//!
//! Generation code never touches a global RNG directly; it draws from a
//! [`UniformSource`] so tests can pin outputs with a scripted source.

use rand::Rng;

/// A source of uniform values in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[0, n)`, derived from a single draw.
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let i = (self.next_unit() * n as f64) as usize;
        i.min(n - 1)
    }
}

/// Production source backed by the thread-local RNG.
pub struct ThreadRngSource(rand::rngs::ThreadRng);

impl ThreadRngSource {
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for ThreadRngSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSource for ThreadRngSource {
    fn next_unit(&mut self) -> f64 {
        self.0.random()
    }
}

/// Replays a fixed sequence of values, cycling when exhausted. Test use only,
/// but kept out of `#[cfg(test)]` so integration tests can reach it.
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UniformSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
