//! Periodic random-record generation.
//!
//! [`sampler`] holds the pure, seedable sampling primitives; [`emitter`]
//! drives them from a timer and emits one structured record per tick.

mod emitter;
mod sampler;

pub use emitter::{effective_vocabulary, Emitter, VOCABULARY};
pub use sampler::{entropy_rng, sample_bounded_int, sample_pick, seeded_rng};

#[cfg(test)]
#[path = "sampler_test.rs"]
mod sampler_tests;

#[cfg(test)]
#[path = "emitter_test.rs"]
mod emitter_tests;
