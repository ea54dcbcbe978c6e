//! # Seed Derivation
//!
//! Fans one master seed out into independent child seeds.
//!
//! The room layer hands out one seed per spawn or combat event. A client
//! that only renders part of a cluster derives the children it needs and
//! gets exactly the values the server computed for the whole cluster.

use super::{RandomStream, SeedSource};
use crate::config::{SEED_STRIDE, TWO_POW_32};

/// Derives the `index`-th child of a parent seed.
///
/// `child = (normalize(parent) + index * 0x9E3779B1) mod 2^32`
///
/// # Examples
///
/// ```
/// use morphogen::derive_child_seed;
///
/// assert_eq!(derive_child_seed(1337_u32, 0), 1337);
/// assert_eq!(derive_child_seed(1337_u32, 1), 2_654_437_098);
/// assert_eq!(derive_child_seed(0.0_f64, 3), derive_child_seed(1_u32, 3));
/// ```
pub fn derive_child_seed<S: SeedSource>(parent: S, index: u32) -> u32 {
    parent
        .normalized()
        .wrapping_add(index.wrapping_mul(SEED_STRIDE))
}

/// Derives `count` consecutive children starting at index zero.
pub fn derive_child_seeds<S: SeedSource>(parent: S, count: u32) -> Vec<u32> {
    let parent = parent.normalized();
    (0..count)
        .map(|index| derive_child_seed(parent, index))
        .collect()
}

/// Builds the stream for the `index`-th child of a parent seed.
pub fn derive_child_stream<S: SeedSource>(parent: S, index: u32) -> RandomStream {
    RandomStream::new(derive_child_seed(parent, index))
}

/// Packs one unit-interval draw into a transmittable 32-bit seed.
///
/// `floor(value * 2^32) mod 2^32`. Non-finite inputs pack to zero.
///
/// # Examples
///
/// ```
/// use morphogen::to_seed_value;
///
/// assert_eq!(to_seed_value(0.0), 0);
/// assert_eq!(to_seed_value(0.5), 2_147_483_648);
/// assert_eq!(to_seed_value(1.0), 0);
/// ```
pub fn to_seed_value(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    (value * TWO_POW_32).floor().rem_euclid(TWO_POW_32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_seed_values() {
        assert_eq!(derive_child_seed(1_u32, 3), 3_668_339_988);
        assert_eq!(derive_child_seed(u32::MAX, 1), 2_654_435_760);
    }

    #[test]
    fn test_child_seed_is_stable() {
        let first = derive_child_seed(987_654_u32, 17);
        for _ in 0..10 {
            assert_eq!(derive_child_seed(987_654_u32, 17), first);
        }
        assert_eq!(derive_child_seed(987_654.0_f64, 17), first);
    }

    #[test]
    fn test_children_are_distinct() {
        let children = derive_child_seeds(42_u32, 64);
        let mut sorted = children.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), children.len());
        assert_eq!(children[5], derive_child_seed(42_u32, 5));
    }

    #[test]
    fn test_child_stream_matches_child_seed() {
        let mut from_stream = derive_child_stream(42_u32, 2);
        let mut direct = RandomStream::new(derive_child_seed(42_u32, 2));
        assert_eq!(from_stream.next_u32(), direct.next_u32());
    }

    #[test]
    fn test_seed_value_packing() {
        assert_eq!(to_seed_value(0.25), 1_073_741_824);
        assert_eq!(to_seed_value(0.999_999_999_999), 4_294_967_295);
        assert_eq!(to_seed_value(-0.25), 3_221_225_472);
        assert_eq!(to_seed_value(f64::NAN), 0);
        assert_eq!(to_seed_value(f64::INFINITY), 0);
    }

    #[test]
    fn test_seed_value_round_trips_raw_draw() {
        let mut a = RandomStream::new(77_u32);
        let mut b = RandomStream::new(77_u32);
        assert_eq!(to_seed_value(a.next_f64()), b.next_u32());
    }
}
