//! Public Aligner: input-shape validation plus the two façade operations,
//! `score_only` and `score_and_align`. This is the only part of the crate
//! that knows about concrete backend types; everything below it is generic
//! over `VectorOps`.

use crate::band::{BandEngine, GapPenalty};
use crate::codec::MAX_SCORE;
use crate::error::AlignerError;
use crate::simd::{Avx2Vector, Backend, ScalarVector, Sse2Vector, VectorOps};
use crate::trace::{reconstruct, TraceStore};

/// Outcome of `score_and_align`: the bias-corrected score and the 0-based
/// offset in `T` where the recovered alignment begins. A score of `-1`
/// (with `first_pos == -1`) signals the documented overflow sentinel, not
/// an error — both output buffers are left empty in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentOutcome {
    pub score: i16,
    pub first_pos: i64,
}

/// A configured aligner bound to one `VectorOps` backend. Construction
/// resolves `Backend::detect_best()` (or an explicitly requested backend)
/// exactly once; every subsequent call reuses that choice.
pub struct Aligner {
    backend: Backend,
}

impl Aligner {
    /// Build an aligner using the widest backend the running CPU supports.
    pub fn new() -> Self {
        Aligner {
            backend: Backend::detect_best(),
        }
    }

    /// Build an aligner pinned to a specific backend. Returns an error if
    /// the backend is not available on this CPU.
    pub fn with_backend(backend: Backend) -> Result<Self, AlignerError> {
        if !backend.is_supported() {
            return Err(AlignerError::ShapeMismatch {
                detail: format!("backend {backend} is not supported on this CPU"),
            });
        }
        Ok(Aligner { backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The minimum score of any global alignment of `query` against `truth`
    /// within the anti-diagonal band, or the saturated score if the
    /// recurrence never found a valid exit-column cell.
    pub fn score_only(
        &self,
        truth: &[u8],
        query: &[u8],
        quality: &[i8],
        gap_open: GapPenalty,
        gap_extend: GapPenalty,
        nuc_prior: i16,
    ) -> Result<i16, AlignerError> {
        validate(self.backend, truth, query, quality, gap_open, gap_extend, nuc_prior)?;

        let score = match self.backend {
            Backend::Scalar => {
                run_score_only::<ScalarVector<8>>(truth, query, quality, gap_open, gap_extend, nuc_prior)
            }
            Backend::Sse2 => {
                run_score_only::<Sse2Vector>(truth, query, quality, gap_open, gap_extend, nuc_prior)
            }
            Backend::Avx2 => {
                run_score_only::<Avx2Vector>(truth, query, quality, gap_open, gap_extend, nuc_prior)
            }
        };
        Ok(score)
    }

    /// As `score_only`, but also recovers a gapped alignment into
    /// `align_truth`/`align_query`. Both buffers must have capacity for at
    /// least `2*|truth| + 1` bytes; they are cleared and repopulated on
    /// success, and left empty on the overflow sentinel.
    pub fn score_and_align(
        &self,
        truth: &[u8],
        query: &[u8],
        quality: &[i8],
        gap_open: GapPenalty,
        gap_extend: GapPenalty,
        nuc_prior: i16,
        align_truth: &mut Vec<u8>,
        align_query: &mut Vec<u8>,
    ) -> Result<AlignmentOutcome, AlignerError> {
        validate(self.backend, truth, query, quality, gap_open, gap_extend, nuc_prior)?;

        let required = 2 * truth.len() + 1;
        if align_truth.capacity() < required {
            return Err(AlignerError::BufferTooSmall {
                required,
                actual: align_truth.capacity(),
            });
        }
        if align_query.capacity() < required {
            return Err(AlignerError::BufferTooSmall {
                required,
                actual: align_query.capacity(),
            });
        }

        align_truth.clear();
        align_query.clear();

        let outcome = match self.backend {
            Backend::Scalar => run_score_and_align::<ScalarVector<8>>(
                truth, query, quality, gap_open, gap_extend, nuc_prior, align_truth, align_query,
            ),
            Backend::Sse2 => run_score_and_align::<Sse2Vector>(
                truth, query, quality, gap_open, gap_extend, nuc_prior, align_truth, align_query,
            ),
            Backend::Avx2 => run_score_and_align::<Avx2Vector>(
                truth, query, quality, gap_open, gap_extend, nuc_prior, align_truth, align_query,
            ),
        };
        Ok(outcome)
    }
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new()
    }
}

fn run_score_only<V: VectorOps>(
    truth: &[u8],
    query: &[u8],
    quality: &[i8],
    gap_open: GapPenalty,
    gap_extend: GapPenalty,
    nuc_prior: i16,
) -> i16 {
    let engine = BandEngine::<V>::new(truth, query, quality, gap_open, gap_extend, nuc_prior);
    engine.run(None).score
}

fn run_score_and_align<V: VectorOps>(
    truth: &[u8],
    query: &[u8],
    quality: &[i8],
    gap_open: GapPenalty,
    gap_extend: GapPenalty,
    nuc_prior: i16,
    align_truth: &mut Vec<u8>,
    align_query: &mut Vec<u8>,
) -> AlignmentOutcome {
    let lanes = V::LANES;
    let half_steps = 2 * (truth.len() + lanes);
    let engine = BandEngine::<V>::new(truth, query, quality, gap_open, gap_extend, nuc_prior);
    let result = engine.run(Some(TraceStore::<V>::with_capacity(half_steps)));

    let recon = result
        .exit_step
        .zip(result.trace.as_ref())
        .and_then(|(s, trace)| reconstruct(truth, query, trace, s));

    match recon {
        Some(r) => {
            align_truth.extend_from_slice(r.truth_alignment.as_bytes());
            align_query.extend_from_slice(r.query_alignment.as_bytes());
            AlignmentOutcome {
                score: result.score,
                first_pos: r.first_pos,
            }
        }
        None => AlignmentOutcome {
            score: -1,
            first_pos: -1,
        },
    }
}

/// Shape preconditions from spec.md §3/§6, checked before any engine state
/// is seeded.
fn validate(
    backend: Backend,
    truth: &[u8],
    query: &[u8],
    quality: &[i8],
    gap_open: GapPenalty,
    gap_extend: GapPenalty,
    _nuc_prior: i16,
) -> Result<(), AlignerError> {
    let b = backend.lanes();

    if truth.len() <= b {
        return Err(AlignerError::ShapeMismatch {
            detail: format!("|T| = {} must be greater than B = {b}", truth.len()),
        });
    }
    let expected_truth_len = query.len() + 2 * b - 1;
    if truth.len() != expected_truth_len {
        return Err(AlignerError::ShapeMismatch {
            detail: format!(
                "|T| = {} must equal |Q| + 2*B - 1 = {expected_truth_len}",
                truth.len()
            ),
        });
    }
    if quality.len() != query.len() {
        return Err(AlignerError::ShapeMismatch {
            detail: format!(
                "|q| = {} must equal |Q| = {}",
                quality.len(),
                query.len()
            ),
        });
    }
    if let Some(len) = gap_open.len() {
        if len != truth.len() {
            return Err(AlignerError::ShapeMismatch {
                detail: format!("|gO| = {len} must equal |T| = {}", truth.len()),
            });
        }
        for pos in 0..len {
            let v = gap_open.at(pos);
            if v < 0 || v as i16 > MAX_SCORE {
                return Err(AlignerError::InvalidGapPenalty {
                    truth_pos: pos,
                    value: v,
                });
            }
        }
    }
    if let Some(len) = gap_extend.len() {
        if len != truth.len() {
            return Err(AlignerError::ShapeMismatch {
                detail: format!("|gE| = {len} must equal |T| = {}", truth.len()),
            });
        }
        for pos in 0..len {
            let v = gap_extend.at(pos);
            if v < 0 || v as i16 > MAX_SCORE {
                return Err(AlignerError::InvalidGapPenalty {
                    truth_pos: pos,
                    value: v,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_quality(len: usize, q: i8) -> Vec<i8> {
        vec![q; len]
    }

    #[test]
    fn rejects_truth_not_longer_than_band() {
        let aligner = Aligner::with_backend(Backend::Scalar).unwrap();
        let truth = b"SHORT123";
        let query = b"Q";
        let qual = uniform_quality(query.len(), 40);
        let err = aligner
            .score_only(truth, query, &qual, GapPenalty::Scalar(10), GapPenalty::Scalar(1), 4)
            .unwrap_err();
        assert!(matches!(err, AlignerError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_mismatched_truth_length() {
        let aligner = Aligner::with_backend(Backend::Scalar).unwrap();
        let truth = b"ACGTACGTACGTACGAAAA"; // len 19, built for B=8,|Q|=4
        let query = b"AAA"; // len 3, expects |T| = 3 + 15 = 18
        let qual = uniform_quality(query.len(), 40);
        let err = aligner
            .score_only(truth, query, &qual, GapPenalty::Scalar(10), GapPenalty::Scalar(1), 4)
            .unwrap_err();
        assert!(matches!(err, AlignerError::ShapeMismatch { .. }));
    }

    #[test]
    fn scenario_one_perfect_suffix_match() {
        let aligner = Aligner::with_backend(Backend::Scalar).unwrap();
        let truth = b"ACGTACGTACGTACGAAAA";
        let query = b"AAAA";
        let qual = uniform_quality(query.len(), 40);
        let score = aligner
            .score_only(truth, query, &qual, GapPenalty::Scalar(10), GapPenalty::Scalar(1), 4)
            .unwrap();
        assert_eq!(score, 0);
    }
}
