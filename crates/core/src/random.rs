//! Seeded pseudo-random numbers.
//!
//! The generator is reproducible from its seed string alone: the initial state
//! is a 32-bit FNV-1a hash of the seed, and each draw advances a 32-bit linear
//! congruential generator. All integer arithmetic wraps at `2^32`, so output is
//! bit-identical to the browser implementation that produced existing designs.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Hash a seed string with 32-bit FNV-1a.
///
/// The seed is consumed as UTF-16 code units, which equals code points for
/// every character in the Basic Multilingual Plane.
///
/// ```
/// use tezweb_core::random::hash_seed;
///
/// assert_eq!(hash_seed(""), 2_166_136_261);
/// assert_eq!(hash_seed("a"), 0xe40c_292c);
/// ```
#[must_use]
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic generator of floats in `[0, 1)`.
///
/// Each call to [`SeededRandom::next_f64`] advances the internal state. A fresh
/// generator built from the same seed replays the exact same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Create a generator whose state is the hash of `seed`.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Advance the state and return the raw 32-bit value.
    pub const fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Advance the state and return a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Draw an index in `0..len` as `floor(next_f64() * len)`.
    ///
    /// Returns `None` for an empty range without advancing the state.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)] // Candidate lists are tiny
        let scaled = (self.next_f64() * len as f64).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // 0 <= scaled < len
        let index = scaled as usize;
        Some(index.min(len - 1))
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_f64())
    }
}
