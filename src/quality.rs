//! Accuracy reports for a digest.
//!
//! [`compare_cdf`] measures a digest against a known reference CDF on a probe
//! set; [`ks_statistic`] is the one-sample Kolmogorov-Smirnov distance between
//! a sample and the digest's CDF.

use tracing::info;

use crate::tdigest::Digest;
use crate::{TdError, TdResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    /// Number of probes evaluated.
    pub n: usize,
    /// Largest absolute CDF difference over the probes.
    pub ks: f64,
    /// Mean absolute CDF difference over the probes.
    pub mae: f64,
}

impl QualityReport {
    /// `true` when `self` is no worse than `other` on both error measures.
    pub fn strictly_better_than(&self, other: &QualityReport) -> bool {
        let eps = 1e-12;
        (self.ks <= other.ks + eps) && (self.mae <= other.mae + eps)
    }

    pub fn to_line(&self) -> String {
        format!(
            "QualityReport(n={}, KS={:.6e}, MAE={:.6e})",
            self.n, self.ks, self.mae
        )
    }

    pub fn log(&self) {
        info!(n = self.n, ks = self.ks, mae = self.mae, "cdf quality");
    }
}

/// Compare `digest.cdf` with `reference` at every probe.
///
/// Fails on an empty probe set or a NaN probe.
pub fn compare_cdf<F>(digest: &Digest, probes: &[f64], reference: F) -> TdResult<QualityReport>
where
    F: Fn(f64) -> f64,
{
    if probes.is_empty() {
        return Err(TdError::invalid("probe count", 0.0, "at least 1"));
    }
    let got = digest.cdf_many(probes)?;

    let mut ks = 0.0_f64;
    let mut sum_abs = 0.0;
    for (&x, &p) in probes.iter().zip(&got) {
        let d = (p - reference(x)).abs();
        ks = ks.max(d);
        sum_abs += d;
    }
    Ok(QualityReport {
        n: probes.len(),
        ks,
        mae: sum_abs / probes.len() as f64,
    })
}

/// Two-sided one-sample KS statistic of `sample` against `digest.cdf`:
/// `sup_x |ECDF(x) - cdf(x)|`, evaluated on both sides of every sample step.
pub fn ks_statistic(digest: &Digest, sample: &[f64]) -> TdResult<f64> {
    if sample.is_empty() {
        return Err(TdError::invalid("sample size", 0.0, "at least 1"));
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    // Rejects NaN, so the total order above is the numeric order.
    let fs = digest.cdf_many(&sorted)?;

    let n = sorted.len() as f64;
    let mut d = 0.0_f64;
    for (i, &f) in fs.iter().enumerate() {
        let below = i as f64 / n;
        let above = (i + 1) as f64 / n;
        d = d.max(f - below).max(above - f);
    }
    Ok(d)
}
