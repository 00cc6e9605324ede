//! Pure sampling primitives over an explicit random stream.
//!
//! Every function takes the stream by handle so output sequences are
//! reproducible under a fixed seed pair. Nothing here reads ambient
//! entropy - [`entropy_rng`] seeds from the wall clock at construction
//! time and is the only place randomness enters from outside.

use rand::Rng;
use rand_pcg::Pcg64Dxsm;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a uniformly random integer in `[0, max]` inclusive.
///
/// `max <= 0` is degenerate configuration, not an error: the result is
/// always 0.
pub fn sample_bounded_int<R: Rng>(rng: &mut R, max: i64) -> i64 {
    if max <= 0 {
        return 0;
    }
    rng.random_range(0..=max)
}

/// Returns a uniformly random element of `items`.
///
/// An empty slice is degenerate configuration, not an error: the result
/// is the empty string.
pub fn sample_pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    if items.is_empty() {
        return "";
    }
    items[rng.random_range(0..items.len())]
}

/// Builds a deterministic random stream from a fixed seed pair.
///
/// Two streams built from the same pair yield identical sequences.
pub fn seeded_rng(seed1: u64, seed2: u64) -> Pcg64Dxsm {
    Pcg64Dxsm::new(u128::from(seed1), u128::from(seed2))
}

/// Builds a production random stream seeded from wall-clock nanos.
pub fn entropy_rng() -> Pcg64Dxsm {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    seeded_rng(nanos, nanos >> 32)
}
