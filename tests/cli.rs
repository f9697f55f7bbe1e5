use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn run_cli(args: &[&str], stdin_data: Option<&str>) -> String {
    let mut cmd = Command::cargo_bin("tdigest").expect("cli binary");
    cmd.args(args);
    if let Some(data) = stdin_data {
        cmd.write_stdin(data);
    }
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out)
        .expect("utf8 output")
        .trim()
        .to_string()
}

fn parse_pairs(out: &str) -> Vec<(f64, f64)> {
    out.lines()
        .map(|line| {
            let (x, y) = line.split_once('\t').expect("tab separated");
            (x.parse().expect("x"), y.parse().expect("y"))
        })
        .collect()
}

#[test]
fn cdf_at_explicit_probes() {
    let out = run_cli(&["cdf", "--probes", "1.5, 3 -1"], Some("0 1\n2,3"));
    let rows = parse_pairs(&out);
    assert_eq!(rows, vec![(1.5, 0.5), (3.0, 1.0), (-1.0, 0.0)]);
}

#[test]
fn cdf_defaults_to_input_values() {
    let out = run_cli(&["cdf"], Some("5 5 5"));
    let rows = parse_pairs(&out);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|&(x, p)| x == 5.0 && p == 1.0));
}

#[test]
fn quantile_median_of_small_input() {
    let out = run_cli(&["quantile", "-q", "0.5"], Some("0 1 2 3"));
    let median = out.parse::<f64>().expect("median output");
    assert!((median - 1.5).abs() <= 1e-12);
}

#[test]
fn quantile_rejects_out_of_range_q() {
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["quantile", "-q", "1.5"])
        .write_stdin("1 2 3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantile"));
}

#[test]
fn rejects_non_numeric_input_and_bad_compression() {
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .arg("summary")
        .write_stdin("1 two 3")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));

    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["--compression", "0", "summary"])
        .write_stdin("1 2 3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("compression"));
}

#[test]
fn score_saturates_past_the_maximum() {
    let out = run_cli(
        &["score", "--probes", "-1 0 9 50"],
        Some("0 1 2 3 4 5 6 7 8 9"),
    );
    let rows = parse_pairs(&out);
    assert_eq!(rows[0].1, 0.0);
    for w in rows.windows(2) {
        assert!(w[0].1 <= w[1].1, "{rows:?}");
    }
    let cap = -(1e-100f64).ln();
    assert!((rows[3].1 - cap).abs() < 1e-9);
    assert!((rows[2].1 - cap).abs() < 1e-9);
}

#[test]
fn score_honours_custom_floor() {
    let out = run_cli(&["score", "--floor", "0.001", "--probes", "100"], Some("1 2 3"));
    let rows = parse_pairs(&out);
    assert!((rows[0].1 - -(0.001f64).ln()).abs() < 1e-12);
}

#[test]
fn snapshot_round_trip_preserves_the_digest() {
    let td = assert_fs::TempDir::new().expect("temp dir");
    let snap = td.child("digest.bin");
    let path = snap.path().to_str().expect("snapshot path");

    let data: String = (0..1_000).map(|i| format!("{}\n", (i * 37) % 1_000)).collect();
    let built = run_cli(&["--to-digest", path, "summary"], Some(&data));
    snap.assert(predicate::path::exists());

    let loaded = run_cli(&["--from-digest", path, "summary"], None);
    assert_eq!(built, loaded);
    assert!(loaded.lines().any(|l| l == "count\t1000"), "{loaded}");

    let out = run_cli(&["--from-digest", path, "cdf", "--probes", "999"], None);
    assert_eq!(parse_pairs(&out), vec![(999.0, 1.0)]);
}

#[test]
fn loaded_digest_needs_explicit_probes() {
    let td = assert_fs::TempDir::new().expect("temp dir");
    let snap = td.child("digest.bin");
    let path = snap.path().to_str().expect("snapshot path");
    run_cli(&["--to-digest", path, "summary"], Some("1 2 3"));

    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["--from-digest", path, "cdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--probes"));
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let td = assert_fs::TempDir::new().expect("temp dir");
    let snap = td.child("junk.bin");
    snap.write_binary(&[0xff, 0x00, 0x13]).expect("write junk");

    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["--from-digest", snap.path().to_str().expect("path"), "summary"])
        .assert()
        .failure();
}
