use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use octopus_pairhmm::{Aligner, Backend, GapPenalty};

fn make_inputs(query_len: usize, lanes: usize) -> (Vec<u8>, Vec<u8>, Vec<i8>) {
    let truth_len = query_len + 2 * lanes - 1;
    let truth: Vec<u8> = (0..truth_len).map(|i| b"ACGT"[i % 4]).collect();
    let query: Vec<u8> = (0..query_len).map(|i| b"ACGT"[(i + 1) % 4]).collect();
    let quality = vec![40i8; query_len];
    (truth, query, quality)
}

fn bench_score_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_only");
    for backend in [Backend::Scalar, Backend::Sse2, Backend::Avx2] {
        if !backend.is_supported() {
            continue;
        }
        let aligner = Aligner::with_backend(backend).unwrap();
        for &query_len in &[50usize, 150, 300] {
            let (truth, query, quality) = make_inputs(query_len, backend.lanes());
            group.bench_with_input(
                BenchmarkId::new(format!("{backend}"), query_len),
                &query_len,
                |b, _| {
                    b.iter(|| {
                        aligner
                            .score_only(
                                black_box(&truth),
                                black_box(&query),
                                black_box(&quality),
                                GapPenalty::Scalar(40),
                                GapPenalty::Scalar(3),
                                4,
                            )
                            .unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_score_and_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_and_align");
    let backend = Backend::detect_best();
    let aligner = Aligner::with_backend(backend).unwrap();
    for &query_len in &[50usize, 150] {
        let (truth, query, quality) = make_inputs(query_len, backend.lanes());
        let required = 2 * truth.len() + 1;
        group.bench_with_input(BenchmarkId::new(format!("{backend}"), query_len), &query_len, |b, _| {
            let mut align_truth = Vec::with_capacity(required);
            let mut align_query = Vec::with_capacity(required);
            b.iter(|| {
                aligner
                    .score_and_align(
                        black_box(&truth),
                        black_box(&query),
                        black_box(&quality),
                        GapPenalty::Scalar(40),
                        GapPenalty::Scalar(3),
                        4,
                        &mut align_truth,
                        &mut align_query,
                    )
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_score_only, bench_score_and_align);
criterion_main!(benches);
