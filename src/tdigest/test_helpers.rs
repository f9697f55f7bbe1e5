//! Assertion helpers shared by the in-crate test modules.

pub fn assert_exact(label: &str, expected: f64, got: f64) {
    assert!(
        expected == got,
        "{}: expected exactly {:.9}, got {:.9}",
        label,
        expected,
        got
    );
}

pub fn assert_abs_close(label: &str, expected: f64, got: f64, atol: f64) {
    let err = (expected - got).abs();
    assert!(
        err <= atol,
        "{}: expected ~= {:.9}, got {:.9}, abs_err={:.6e}, atol={:.6e}",
        label,
        expected,
        got,
        err,
        atol
    );
}

pub fn assert_monotone_chain(label: &str, values: &[f64]) {
    for i in 1..values.len() {
        assert!(
            values[i] >= values[i - 1],
            "{}: non-monotone at i={}: {} < {}",
            label,
            i,
            values[i],
            values[i - 1]
        );
    }
}

pub fn assert_in_bracket(label: &str, x: f64, lo: f64, hi: f64) {
    assert!(
        x >= lo && x <= hi,
        "{}: {} not in bracket [{}, {}]",
        label,
        x,
        lo,
        hi
    );
}

/// Order statistics bracketing quantile `q` of a sorted sample.
pub fn bracket(sorted: &[f64], q: f64) -> (f64, f64) {
    assert!(!sorted.is_empty(), "bracket() requires non-empty values");
    let n = sorted.len();
    let r = q.clamp(0.0, 1.0) * (n.saturating_sub(1) as f64);
    (sorted[r.floor() as usize], sorted[r.ceil() as usize])
}
