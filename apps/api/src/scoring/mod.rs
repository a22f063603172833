//! Score resolution: untyped analysis payload in, bounded canonical score out.
//!
//! Nothing in here does I/O or reads configuration; every function is pure
//! and safe to call from any number of handlers at once.

pub mod precedence;
pub mod raw;
pub mod resolver;

pub use resolver::{resolve_value, Breakdown, ResolvedScore};

/// Rounds to the nearest integer, halves going up (`43.5 → 44`, `-0.5 → 0`).
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Rounds and clamps to the 0-100 score range. Infinities saturate; NaN is 0.
pub fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    round_half_up(value.clamp(0.0, 100.0)) as u32
}
