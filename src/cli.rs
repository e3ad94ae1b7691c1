//! JSON façade for the `pairhmm-score` demo binary.
//!
//! This is a test harness and worked example, not a production read mapper:
//! it does no SAM/BAM/CRAM or VCF I/O and has no knowledge of reference
//! genomes or variant candidates (see spec's Non-goals). It exists so the
//! engine can be exercised from the command line the same way the teacher's
//! `qm-agent` binary exposes its solver.

use std::fs;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::aligner::Aligner;
use crate::band::GapPenalty;
use crate::simd::Backend;

/// One scoring/alignment request. `gap_open`/`gap_extend` may each be given
/// as a single scalar or as one value per truth position.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub truth: String,
    pub query: String,
    /// Per-base quality; defaults to a uniform value if omitted.
    #[serde(default)]
    pub quality: Option<Vec<i8>>,
    #[serde(default = "default_quality_value")]
    pub uniform_quality: i8,
    pub gap_open: GapSpec,
    pub gap_extend: GapSpec,
    #[serde(default = "default_nuc_prior")]
    pub nuc_prior: i16,
    /// When `true`, also recover and report the gapped alignment.
    #[serde(default)]
    pub align: bool,
    /// Backend to use: "auto" (default), "scalar", "sse2", or "avx2".
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_quality_value() -> i8 {
    40
}

fn default_nuc_prior() -> i16 {
    4
}

fn default_backend() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GapSpec {
    Scalar(i8),
    PerPosition(Vec<i8>),
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: i16,
    pub backend: String,
    pub first_pos: Option<i64>,
    pub align_truth: Option<String>,
    pub align_query: Option<String>,
}

/// Parse `input` as a file path first, falling back to treating it as an
/// inline JSON document.
pub fn parse_request(input: &str) -> Result<ScoreRequest> {
    let raw = match fs::read_to_string(input) {
        Ok(contents) => contents,
        Err(_) => input.to_string(),
    };
    serde_json::from_str(&raw).with_context(|| "failed to parse request JSON".to_string())
}

fn resolve_backend(name: &str) -> Result<Backend> {
    match name {
        "auto" => Ok(Backend::detect_best()),
        "scalar" => Ok(Backend::Scalar),
        "sse2" => Ok(Backend::Sse2),
        "avx2" => Ok(Backend::Avx2),
        other => Err(anyhow!("unknown backend '{other}' (expected auto/scalar/sse2/avx2)")),
    }
}

pub fn run_request(request: &ScoreRequest) -> Result<ScoreResponse> {
    let backend = resolve_backend(&request.backend)?;
    let aligner = Aligner::with_backend(backend).map_err(|e| anyhow!(e.to_string()))?;

    let truth = request.truth.as_bytes();
    let query = request.query.as_bytes();
    let owned_quality;
    let quality: &[i8] = match &request.quality {
        Some(q) => q,
        None => {
            owned_quality = vec![request.uniform_quality; query.len()];
            &owned_quality
        }
    };

    let gap_open_vals;
    let gap_open = match &request.gap_open {
        GapSpec::Scalar(v) => GapPenalty::Scalar(*v),
        GapSpec::PerPosition(vals) => {
            gap_open_vals = vals.clone();
            GapPenalty::PerPosition(&gap_open_vals)
        }
    };
    let gap_extend_vals;
    let gap_extend = match &request.gap_extend {
        GapSpec::Scalar(v) => GapPenalty::Scalar(*v),
        GapSpec::PerPosition(vals) => {
            gap_extend_vals = vals.clone();
            GapPenalty::PerPosition(&gap_extend_vals)
        }
    };

    if !request.align {
        let score = aligner
            .score_only(truth, query, quality, gap_open, gap_extend, request.nuc_prior)
            .map_err(|e| anyhow!(e.to_string()))?;
        return Ok(ScoreResponse {
            score,
            backend: backend.to_string(),
            first_pos: None,
            align_truth: None,
            align_query: None,
        });
    }

    let required = 2 * truth.len() + 1;
    let mut align_truth = Vec::with_capacity(required);
    let mut align_query = Vec::with_capacity(required);
    let outcome = aligner
        .score_and_align(
            truth,
            query,
            quality,
            gap_open,
            gap_extend,
            request.nuc_prior,
            &mut align_truth,
            &mut align_query,
        )
        .map_err(|e| anyhow!(e.to_string()))?;

    Ok(ScoreResponse {
        score: outcome.score,
        backend: backend.to_string(),
        first_pos: Some(outcome.first_pos),
        align_truth: Some(String::from_utf8_lossy(&align_truth).into_owned()),
        align_query: Some(String::from_utf8_lossy(&align_query).into_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inline_json_request() {
        let json = r#"{
            "truth": "ACGTACGTACGTACGAAAA",
            "query": "AAAA",
            "gap_open": 10,
            "gap_extend": 1
        }"#;
        let request = parse_request(json).unwrap();
        assert_eq!(request.truth, "ACGTACGTACGTACGAAAA");
        assert_eq!(request.nuc_prior, 4);
    }

    #[test]
    fn score_only_request_round_trips() {
        let json = r#"{
            "truth": "ACGTACGTACGTACGAAAA",
            "query": "AAAA",
            "gap_open": 10,
            "gap_extend": 1,
            "backend": "scalar"
        }"#;
        let request = parse_request(json).unwrap();
        let response = run_request(&request).unwrap();
        assert_eq!(response.score, 0);
        assert!(response.align_truth.is_none());
    }
}
