//! Quantile evaluation for `Digest`.
//!
//! `quantile(q)` inverts the rank ladder used by [`Digest::cdf`]: the target
//! cumulative weight `q·N` is located between two anchors and the value is
//! interpolated linearly between their positions.
//!
//! # Guarantees
//! - The result is **monotone** in `q` and always finite.
//! - `quantile(0.0) == min()` and `quantile(1.0) == max()`.
//! - `cdf(quantile(q)) ≈ q`; the error is bounded by the weight of the
//!   centroids around `q`, so it shrinks as compression tightens.
//!
//! # Edge cases
//! - **Empty digest** → `NaN`.
//! - `q` outside `[0, 1]` or NaN → [`TdError::InvalidArgument`](crate::TdError).

use crate::tdigest::ladder::Ladder;
use crate::tdigest::Digest;
use crate::{TdError, TdResult};

#[inline]
fn ensure_probability(q: f64) -> TdResult<()> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(TdError::invalid("quantile", q, "in [0, 1]"))
    }
}

impl Digest {
    /// Estimate the value at quantile `q ∈ [0, 1]`.
    pub fn quantile(&self, q: f64) -> TdResult<f64> {
        ensure_probability(q)?;
        Ok(match Ladder::new(self.centroids(), self.min(), self.max()) {
            Some(ladder) => ladder.value_at(q),
            None => f64::NAN,
        })
    }

    /// Inverse CDF; same as [`Digest::quantile`].
    #[inline]
    pub fn cdfi(&self, q: f64) -> TdResult<f64> {
        self.quantile(q)
    }

    /// Batch form of [`Digest::quantile`].
    pub fn quantiles(&self, qs: &[f64]) -> TdResult<Vec<f64>> {
        for &q in qs {
            ensure_probability(q)?;
        }
        let Some(ladder) = Ladder::new(self.centroids(), self.min(), self.max()) else {
            return Ok(vec![f64::NAN; qs.len()]);
        };
        Ok(qs.iter().map(|&q| ladder.value_at(q)).collect())
    }

    /// `quantile(0.5)`; `NaN` when empty.
    pub fn median(&self) -> f64 {
        Ladder::new(self.centroids(), self.min(), self.max())
            .map_or(f64::NAN, |ladder| ladder.value_at(0.5))
    }
}
