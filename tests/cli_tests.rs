use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn scores_inline_json_request() {
    let mut cmd = Command::cargo_bin("pairhmm-score").unwrap();
    cmd.arg("score")
        .arg(r#"{"truth":"ACGTACGTACGTACGAAAA","query":"AAAA","gap_open":10,"gap_extend":1,"backend":"scalar"}"#)
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 0"));
}

#[test]
fn scores_and_aligns_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"truth":"ACGTACGAAGCTACGTACG","query":"CGGC","gap_open":[90,90,90,90,90,90,90,70,90,90,90,90,90,90,90,90,90,90,90],"gap_extend":1,"align":true,"backend":"scalar"}}"#
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("pairhmm-score").unwrap();
    cmd.arg("score").arg(file.path().to_str().unwrap());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("score:   71"))
        .stdout(predicate::str::contains("truth:   CGAAGC"))
        .stdout(predicate::str::contains("query:   CG--GC"));
}

#[test]
fn rejects_malformed_request() {
    let mut cmd = Command::cargo_bin("pairhmm-score").unwrap();
    cmd.arg("score").arg("{ not json");

    cmd.assert().failure();
}

#[test]
fn lists_backends() {
    let mut cmd = Command::cargo_bin("pairhmm-score").unwrap();
    cmd.arg("backends");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("best available"));
}
