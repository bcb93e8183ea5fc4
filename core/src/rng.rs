//! Deterministic random number generation for demo data.
//!
//! RULE: Seeding never calls a platform RNG. Every stream is derived
//! from one master seed and a stable stream index, so a given seed
//! always produces the same roster and the same work history.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SeedRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeedRng {
    /// Create a stream from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn for_stream(master_seed: u64, stream: SeedStream) -> Self {
        Self::new(master_seed, stream as u64).with_name(stream.name())
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform float in [low, low + span).
    pub fn span(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'s, T>(&mut self, items: &'s [T]) -> &'s T {
        let index = self.next_u64_below(items.len() as u64) as usize;
        &items[index]
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SeedStream {
    Roster = 0,
    Shifts = 1,
}

impl SeedStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Shifts => "shifts",
        }
    }
}
