//! # Random Module
//!
//! Portable seeded random streams shared by the room server and its clients.
//!
//! Every value the world generator or combat engine produces is derived from
//! a [`RandomStream`]. The stream is mulberry32 over a single `u32` state word
//! using wrapping arithmetic only, so two processes on different platforms
//! that start from the same seed observe the same infinite sequence.

pub mod seeds;

pub use seeds::*;

use crate::config::{FALLBACK_SEED, MULBERRY_INCREMENT, TWO_POW_32};

/// Anything that can be normalized into a 32-bit stream seed.
///
/// Normalization takes `floor(abs(seed))`, wraps it to 32 bits and maps zero
/// and non-finite inputs to [`FALLBACK_SEED`]. Callers can therefore hand in
/// whatever numeric seed the room layer stored without pre-validating it.
pub trait SeedSource {
    /// Returns the normalized seed.
    fn normalized(self) -> u32;
}

impl SeedSource for f64 {
    fn normalized(self) -> u32 {
        if !self.is_finite() {
            return FALLBACK_SEED;
        }
        // fmod is exact for integral doubles, matching ToUint32
        let wrapped = self.abs().floor() % TWO_POW_32;
        non_zero(wrapped as u32)
    }
}

impl SeedSource for f32 {
    fn normalized(self) -> u32 {
        f64::from(self).normalized()
    }
}

impl SeedSource for u32 {
    fn normalized(self) -> u32 {
        non_zero(self)
    }
}

impl SeedSource for u64 {
    fn normalized(self) -> u32 {
        non_zero(self as u32)
    }
}

impl SeedSource for i64 {
    fn normalized(self) -> u32 {
        non_zero(self.unsigned_abs() as u32)
    }
}

impl SeedSource for i32 {
    fn normalized(self) -> u32 {
        non_zero(self.unsigned_abs())
    }
}

fn non_zero(seed: u32) -> u32 {
    if seed == 0 {
        FALLBACK_SEED
    } else {
        seed
    }
}

/// Normalizes an arbitrary numeric seed into a non-zero `u32`.
///
/// # Examples
///
/// ```
/// use morphogen::normalize_seed;
///
/// assert_eq!(normalize_seed(42.9_f64), 42);
/// assert_eq!(normalize_seed(-7_i64), 7);
/// assert_eq!(normalize_seed(0_u32), 1);
/// assert_eq!(normalize_seed(f64::NAN), 1);
/// assert_eq!(normalize_seed(4_294_967_297.0_f64), 1);
/// ```
pub fn normalize_seed<S: SeedSource>(seed: S) -> u32 {
    seed.normalized()
}

/// A deterministic mulberry32 stream bound to one state word.
///
/// A stream must be consumed in a fixed order by exactly one caller. Work
/// that needs to run in parallel should derive child seeds up front with
/// [`derive_child_seed`] instead of sharing a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomStream {
    /// Normalized seed the stream was created from
    seed: u32,
    /// Current state word
    state: u32,
    /// Number of draws consumed so far
    draws: u64,
}

impl RandomStream {
    /// Creates a stream from any seed source.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::RandomStream;
    ///
    /// let mut a = RandomStream::new(1337_u32);
    /// let mut b = RandomStream::new(1337.0_f64);
    /// assert_eq!(a.next_f64(), b.next_f64());
    /// ```
    pub fn new<S: SeedSource>(seed: S) -> Self {
        let seed = seed.normalized();
        Self {
            seed,
            state: seed,
            draws: 0,
        }
    }

    /// Gets the normalized seed this stream started from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Gets the number of draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Advances the state and returns the raw mixed 32-bit word.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        self.draws += 1;

        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Returns a uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Returns a uniform float in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniform index below `len`, or `None` for an empty range.
    ///
    /// An empty range consumes no draw.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = (self.next_f64() * len as f64).floor() as usize;
        Some(index.min(len - 1))
    }

    /// Picks one element uniformly from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|index| &items[index])
    }

    /// Returns `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

/// Creates a fresh stream for one generation call.
pub fn create_stream<S: SeedSource>(seed: S) -> RandomStream {
    RandomStream::new(seed)
}

impl rand::RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        RandomStream::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(RandomStream::next_u32(self));
        let low = u64::from(RandomStream::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = RandomStream::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence_for_seed_one() {
        let mut stream = RandomStream::new(1_u32);
        assert_eq!(stream.next_u32(), 2_693_262_067);
        assert_eq!(stream.next_u32(), 11_749_833);
        assert_eq!(stream.next_u32(), 2_265_367_787);
        assert_eq!(stream.next_u32(), 4_213_581_821);
    }

    #[test]
    fn test_first_float_for_seed_one() {
        let mut stream = RandomStream::new(1_u32);
        assert_eq!(stream.next_f64(), 0.6270739405881613);
    }

    #[test]
    fn test_known_sequence_for_seed_1337() {
        let mut stream = RandomStream::new(1337_u32);
        let words: Vec<u32> = (0..4).map(|_| stream.next_u32()).collect();
        assert_eq!(words, vec![792_042_790, 815_997_621, 3_480_950_701, 2_764_880_138]);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_seed(0.0_f64), 1);
        assert_eq!(normalize_seed(-0.0_f64), 1);
        assert_eq!(normalize_seed(f64::INFINITY), 1);
        assert_eq!(normalize_seed(f64::NEG_INFINITY), 1);
        assert_eq!(normalize_seed(12.75_f64), 12);
        assert_eq!(normalize_seed(-12.75_f64), 12);
        assert_eq!(normalize_seed(4_294_967_296.0_f64), 1);
        assert_eq!(normalize_seed(4_294_967_301.0_f64), 5);
        assert_eq!(normalize_seed(u64::from(u32::MAX) + 2), 1);
        assert_eq!(normalize_seed(i64::MIN), 1);
        assert_eq!(normalize_seed(-5_i32), 5);
    }

    #[test]
    fn test_zero_seed_matches_fallback_stream() {
        let mut zero = RandomStream::new(0_u32);
        let mut one = RandomStream::new(1_u32);
        assert_eq!(zero.seed(), 1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_floats_stay_in_unit_interval() {
        let mut stream = RandomStream::new(99_u32);
        for _ in 0..10_000 {
            let value = stream.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_index_and_pick() {
        let mut stream = RandomStream::new(7_u32);
        assert_eq!(stream.index(0), None);
        assert_eq!(stream.draws(), 0);

        for _ in 0..1_000 {
            assert!(stream.index(3).unwrap() < 3);
        }

        let items = ["a", "b", "c"];
        assert!(items.contains(stream.pick(&items).unwrap()));
        let empty: [u8; 0] = [];
        assert!(stream.pick(&empty).is_none());
    }

    #[test]
    fn test_range_bounds() {
        let mut stream = RandomStream::new(5_u32);
        for _ in 0..1_000 {
            let value = stream.range(20.0, 90.0);
            assert!((20.0..90.0).contains(&value));
        }
    }

    #[test]
    fn test_draw_counter() {
        let mut stream = RandomStream::new(3_u32);
        stream.next_f64();
        stream.next_u32();
        assert_eq!(stream.draws(), 2);
    }

    #[test]
    fn test_rng_core_interop() {
        use rand::{Rng, RngCore};

        let mut a = RandomStream::new(11_u32);
        let mut b = RandomStream::new(11_u32);
        assert_eq!(RngCore::next_u32(&mut a), b.next_u32());

        let mut bytes = [0u8; 6];
        a.fill_bytes(&mut bytes);
        let first = b.next_u32().to_le_bytes();
        let second = b.next_u32().to_le_bytes();
        assert_eq!(&bytes[..4], &first);
        assert_eq!(&bytes[4..], &second[..2]);

        let roll: u8 = a.gen_range(1..=6);
        assert!((1..=6).contains(&roll));
    }
}
