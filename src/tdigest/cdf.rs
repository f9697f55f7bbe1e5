//! CDF evaluation for `Digest`.
//!
//! # Semantics
//! - **Outside support**: strictly below `min` → `0`, at or above `max` → `1`.
//! - **Inside**: linear interpolation over the rank ladder
//!   `(min, 0)`, `(mean_i, prefix_i + w_i/2)`, `(max, N)`, divided by `N`.
//!
//! # Guarantees
//! - Output is in **[0, 1]** and **non-decreasing** in the probe.
//! - Queries never mutate the digest and never draw randomness.
//!
//! # Edge cases
//! - **Empty digest** → `NaN`.
//! - **NaN probe** → [`TdError::InvalidArgument`](crate::TdError). `±inf` are
//!   valid probes (`0` and `1`).

use rayon::prelude::*;

use crate::tdigest::ladder::Ladder;
use crate::tdigest::Digest;
use crate::{TdError, TdResult};

/// Crossover for parallel evaluation with Rayon.
///
/// Below this size a scalar loop is typically faster.
const PAR_MIN: usize = 32_768;

#[inline]
fn ensure_probe(x: f64) -> TdResult<()> {
    if x.is_nan() {
        return Err(TdError::invalid("cdf probe", x, "a number (not NaN)"));
    }
    Ok(())
}

impl Digest {
    /// Estimated fraction of the absorbed weight at or below `x`.
    pub fn cdf(&self, x: f64) -> TdResult<f64> {
        ensure_probe(x)?;
        Ok(match Ladder::new(self.centroids(), self.min(), self.max()) {
            Some(ladder) => ladder.fraction_at(x),
            None => f64::NAN,
        })
    }

    /// Batch form of [`Digest::cdf`]; the ladder is built once per call.
    pub fn cdf_many(&self, xs: &[f64]) -> TdResult<Vec<f64>> {
        if let Some(&bad) = xs.iter().find(|x| x.is_nan()) {
            return Err(TdError::invalid("cdf probe", bad, "a number (not NaN)"));
        }
        let Some(ladder) = Ladder::new(self.centroids(), self.min(), self.max()) else {
            return Ok(vec![f64::NAN; xs.len()]);
        };
        if xs.len() >= PAR_MIN {
            Ok(xs
                .par_iter()
                .with_min_len(4096)
                .map(|&x| ladder.fraction_at(x))
                .collect())
        } else {
            Ok(xs.iter().map(|&x| ladder.fraction_at(x)).collect())
        }
    }
}
