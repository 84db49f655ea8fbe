//! Signal detectors.
//!
//! Each module derives one family of evidence from the input. Detectors are
//! pure functions over the input plus read-only reference data; they never
//! fail, they just report zero findings.

mod classes;
mod dictionary;
mod entropy;
mod normalize;
mod pattern;

pub use classes::classify;
pub use dictionary::find_matches;
pub use entropy::estimate;
pub use normalize::normalize;
pub use pattern::detect_patterns;

pub(crate) use pattern::repeated_runs;
