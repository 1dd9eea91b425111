//! Seeded shuffle.
//!
//! A string seed is folded into a 32-bit hash, scaled into the state of a
//! small xorshift-multiply generator, and that generator drives a
//! Fisher-Yates shuffle. Same seed and same input length always give the
//! same permutation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Used when the caller passes an empty seed string.
pub const FALLBACK_SEED: &str = "biochem";

const HASH_INIT: u32 = 1_779_033_703;
const HASH_MULTIPLIER: u32 = 3_432_918_353;
const STATE_INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;
const SEED_SCALE: f64 = 1_000_000.0;

/// Order-dependent rolling hash of `seed`, normalized to [0, 1).
///
/// Operates on UTF-16 code units so non-ASCII seeds hash the same way the
/// web client hashes them.
pub fn hash_seed(seed: &str) -> f64 {
    let len = seed.encode_utf16().count() as u32;
    let mut h = HASH_INIT ^ len;
    for unit in seed.encode_utf16() {
        h = (h ^ u32::from(unit)).wrapping_mul(HASH_MULTIPLIER);
        h = h.rotate_left(13);
    }
    f64::from(h) / TWO_POW_32
}

/// Deterministic generator seeded from a string.
#[derive(Debug, Clone)]
pub struct SeedRng {
    state: u32,
}

impl SeedRng {
    pub fn from_seed(seed: &str) -> Self {
        let seed = if seed.is_empty() { FALLBACK_SEED } else { seed };
        // hash is in [0, 1), so the scaled value always fits.
        let scaled = (hash_seed(seed) * SEED_SCALE).floor() as u32;
        Self {
            state: scaled.wrapping_add(STATE_INCREMENT),
        }
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        self.state = t;
        f64::from(t ^ (t >> 14)) / TWO_POW_32
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        let index = (self.next_f64() * bound as f64).floor() as usize;
        index.min(bound - 1)
    }
}

/// Time-based seed for callers that have none.
pub fn time_seed() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

/// Return a shuffled copy of `items`. The input is never modified.
///
/// `None` seeds from the current time; an empty seed uses [`FALLBACK_SEED`].
pub fn randomize_questions<T: Clone>(items: &[T], seed: Option<&str>) -> Vec<T> {
    let mut pool = items.to_vec();
    if pool.len() <= 1 {
        return pool;
    }

    let seed = match seed {
        Some(seed) => seed.to_owned(),
        None => time_seed(),
    };
    let mut rng = SeedRng::from_seed(&seed);
    for i in (1..pool.len()).rev() {
        let j = rng.next_index(i + 1);
        pool.swap(i, j);
    }
    pool
}
