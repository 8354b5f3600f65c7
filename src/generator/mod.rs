// Generator module: synthetic transaction records.

pub mod dataset;
pub mod derivation;
pub mod synthesizer;
pub mod weighted;

pub use dataset::{build_records, rng_for};
