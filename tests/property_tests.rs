//! The universal testable properties from the design spec (§8), checked
//! against synthetic inputs rather than the five fixed scenarios.

use octopus_pairhmm::{Aligner, Backend, GapPenalty};

fn available_backends() -> Vec<Backend> {
    [Backend::Scalar, Backend::Sse2, Backend::Avx2]
        .into_iter()
        .filter(|b| b.is_supported())
        .collect()
}

/// Builds a `(truth, query)` pair where `query` has length `B` and occurs
/// as a contiguous substring of `truth`, with enough arbitrary bases on
/// either side to satisfy `|T| == |Q| + 2*B - 1` (one base more on the tail
/// side than the spec's "B-1 bases" phrasing suggests, since that phrasing
/// is for the general case and this test uses the degenerate `|Q| == B`).
fn suffix_match_inputs(lanes: usize) -> (Vec<u8>, Vec<u8>) {
    let prefix: Vec<u8> = (0..lanes - 1).map(|i| b"ACGT"[i % 4]).collect();
    let suffix: Vec<u8> = (0..lanes).map(|i| b"TGCA"[i % 4]).collect();
    let tail: Vec<u8> = (0..lanes).map(|i| b"GTAC"[i % 4]).collect();

    let mut truth = prefix;
    truth.extend_from_slice(&suffix);
    truth.extend_from_slice(&tail);

    (truth, suffix)
}

#[test]
fn determinism_across_backends() {
    let truth = b"ACGTACGAAGCTACGTACG";
    let query = b"CGGC";
    let quality = [40i8; 4];

    let mut scores = Vec::new();
    for backend in available_backends() {
        if backend.lanes() != 8 {
            continue;
        }
        let aligner = Aligner::with_backend(backend).unwrap();
        let score = aligner
            .score_only(truth, query, &quality, GapPenalty::Scalar(90), GapPenalty::Scalar(1), 4)
            .unwrap();
        scores.push(score);
    }
    assert!(scores.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn self_alignment_identity() {
    for backend in available_backends() {
        let lanes = backend.lanes();
        let aligner = Aligner::with_backend(backend).unwrap();
        let (truth, query) = suffix_match_inputs(lanes);
        let quality = vec![40i8; query.len()];

        let score = aligner
            .score_only(&truth, &query, &quality, GapPenalty::Scalar(10), GapPenalty::Scalar(1), 4)
            .unwrap();
        assert_eq!(score, 0, "backend {backend}");

        let required = 2 * truth.len() + 1;
        let mut align_truth = Vec::with_capacity(required);
        let mut align_query = Vec::with_capacity(required);
        let outcome = aligner
            .score_and_align(
                &truth,
                &query,
                &quality,
                GapPenalty::Scalar(10),
                GapPenalty::Scalar(1),
                4,
                &mut align_truth,
                &mut align_query,
            )
            .unwrap();
        assert_eq!(align_truth, query, "backend {backend}");
        assert_eq!(align_query, query, "backend {backend}");
        assert_eq!(outcome.score, 0);
    }
}

#[test]
fn score_only_matches_score_and_align() {
    let truth = b"ACGTACGAAGCTACGTACG";
    let query = b"CGGC";
    let quality = [40i8; 4];
    let aligner = Aligner::with_backend(Backend::Scalar).unwrap();

    let direct = aligner
        .score_only(truth, query, &quality, GapPenalty::Scalar(90), GapPenalty::Scalar(1), 4)
        .unwrap();

    let mut align_truth = Vec::with_capacity(2 * truth.len() + 1);
    let mut align_query = Vec::with_capacity(2 * truth.len() + 1);
    let outcome = aligner
        .score_and_align(
            truth,
            query,
            &quality,
            GapPenalty::Scalar(90),
            GapPenalty::Scalar(1),
            4,
            &mut align_truth,
            &mut align_query,
        )
        .unwrap();

    assert_eq!(direct, outcome.score);
}

#[test]
fn alignment_consistency_and_band_bound() {
    let truth = b"CCCCACGTATATATATATATATGGGGACGT";
    let query = b"CCCCACGTGGGACGT";
    let quality = [40i8; 15];
    let mut gap_open = [90i8; 30];
    gap_open[8] = 70;

    let aligner = Aligner::with_backend(Backend::Scalar).unwrap();
    let mut align_truth = Vec::with_capacity(2 * truth.len() + 1);
    let mut align_query = Vec::with_capacity(2 * truth.len() + 1);
    let outcome = aligner
        .score_and_align(
            truth,
            query,
            &quality,
            GapPenalty::PerPosition(&gap_open),
            GapPenalty::Scalar(1),
            4,
            &mut align_truth,
            &mut align_query,
        )
        .unwrap();

    let stripped_truth: Vec<u8> = align_truth.iter().copied().filter(|&b| b != b'-').collect();
    let k = stripped_truth.len();
    let first_pos = outcome.first_pos as usize;
    assert_eq!(&stripped_truth[..], &truth[first_pos..first_pos + k]);

    let stripped_query: Vec<u8> = align_query.iter().copied().filter(|&b| b != b'-').collect();
    assert_eq!(stripped_query, query);

    let truth_gaps = align_truth.iter().filter(|&&b| b == b'-').count();
    let query_gaps = align_query.iter().filter(|&&b| b == b'-').count();
    assert!(truth_gaps < Backend::Scalar.lanes());
    assert!(query_gaps < Backend::Scalar.lanes());
}
