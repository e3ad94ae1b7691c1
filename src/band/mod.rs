//! Banded anti-diagonal pair-HMM recurrence.

mod engine;
mod windows;

pub use engine::{BandEngine, BandRunResult};
pub use windows::{GapPenalty, MAX_N_QUALITY, N_SCORE, QUERY_PAD, TRACE_SHIFT, TRUTH_PAD};
