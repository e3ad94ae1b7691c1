//! Banded SIMD pair-HMM aligner: scores, and optionally traces back, the
//! alignment of a target (read) sequence against a truth (candidate
//! haplotype) sequence under a position-dependent affine-gap error model.
//!
//! The crate is organised leaf-first:
//!
//! - [`simd`] — the `VectorOps` capability and its concrete backends.
//! - [`codec`] — the fixed-point score/tag packing convention.
//! - [`band`] — the banded anti-diagonal recurrence.
//! - [`trace`] — the back-pointer buffer and alignment reconstruction.
//! - [`aligner`] — the public façade, [`Aligner::score_only`] and
//!   [`Aligner::score_and_align`].
//! - [`cli`] — the `pairhmm-score` demo binary's JSON request/response
//!   façade; a test harness, not a production read mapper.

pub mod aligner;
pub mod band;
pub mod cli;
pub mod codec;
pub mod error;
pub mod simd;
pub mod trace;

pub use aligner::{Aligner, AlignmentOutcome};
pub use band::GapPenalty;
pub use error::AlignerError;
pub use simd::Backend;
