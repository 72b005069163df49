//! Deterministic RNG wrapper.
//!
//! A run with `ga-seed` set is reproducible end to end: the route
//! down-selection and every GA engine draw from a `SimRng` tree rooted at
//! that seed.  Without a seed the root is seeded from OS entropy.
//!
//! Parallel work (deme sub-populations) never shares a `SimRng`; each worker
//! gets a [`child`](SimRng::child) derived from the root before the parallel
//! section starts.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Run-level RNG for route selection and GA operators.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from `seed` when given, otherwise from OS entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => SimRng(SmallRng::from_entropy()),
        }
    }

    /// Derive a child `SimRng` with a different seed offset, used to seed
    /// per-deme RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform index in `0..n`.  `n` must be non-zero.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }
}
