//! Tail anomaly scores on top of a digest's CDF.
//!
//! `score(x) = -ln(max(1 - cdf(x), floor))`: zero at or below the observed
//! minimum, growing as `x` moves into the upper tail, and capped at
//! `-ln(floor)` once `cdf(x)` reaches 1.

use crate::tdigest::Digest;
use crate::{TdError, TdResult};

/// Default tail-mass floor; saturates at `-ln(1e-100) ≈ 230.26`.
pub const DEFAULT_FLOOR: f64 = 1e-100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailScorer {
    floor: f64,
}

impl Default for TailScorer {
    fn default() -> Self {
        TailScorer {
            floor: DEFAULT_FLOOR,
        }
    }
}

impl TailScorer {
    /// Scorer with a custom tail-mass floor in `(0, 1)`.
    pub fn new(floor: f64) -> TdResult<TailScorer> {
        if floor > 0.0 && floor < 1.0 {
            Ok(TailScorer { floor })
        } else {
            Err(TdError::invalid("score floor", floor, "in (0, 1)"))
        }
    }

    #[inline]
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Largest score this scorer can produce.
    #[inline]
    pub fn saturation(&self) -> f64 {
        -self.floor.ln()
    }

    /// Score a CDF value directly. `NaN` in, `NaN` out.
    #[inline]
    pub fn score_cdf(&self, p: f64) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        (-(1.0 - p).max(self.floor).ln()).max(0.0)
    }

    /// Score `x` against `digest`; `NaN` for an empty digest.
    pub fn score(&self, digest: &Digest, x: f64) -> TdResult<f64> {
        Ok(self.score_cdf(digest.cdf(x)?))
    }

    pub fn score_many(&self, digest: &Digest, xs: &[f64]) -> TdResult<Vec<f64>> {
        Ok(digest
            .cdf_many(xs)?
            .into_iter()
            .map(|p| self.score_cdf(p))
            .collect())
    }
}
