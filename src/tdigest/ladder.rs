//! Piecewise-linear rank ladder shared by `cdf` and `quantile`.
//!
//! Anchors (value, cumulative weight):
//!
//! ```text
//!   (min, 0)  (mean_0, w_0/2)  (mean_1, w_0 + w_1/2)  ...  (max, N)
//! ```
//!
//! Each centroid is a point mass centred at half its weight. The observed
//! `min`/`max` close the ladder so both tails ramp linearly to 0 and 1.
//! Values are non-decreasing along the ladder, ranks strictly increasing,
//! which makes both directions monotone.

use crate::tdigest::centroids::Centroid;

pub(crate) struct Ladder {
    xs: Vec<f64>,
    ranks: Vec<f64>,
    total: f64,
}

impl Ladder {
    /// `None` for an empty digest.
    pub(crate) fn new(cents: &[Centroid], min: f64, max: f64) -> Option<Ladder> {
        let (first, last) = (cents.first()?, cents.last()?);
        let mut xs = Vec::with_capacity(cents.len() + 2);
        let mut ranks = Vec::with_capacity(cents.len() + 2);

        xs.push(min.min(first.mean()));
        ranks.push(0.0);
        let mut run = 0.0_f64;
        for c in cents {
            xs.push(c.mean());
            ranks.push(run + c.weight() / 2.0);
            run += c.weight();
        }
        xs.push(max.max(last.mean()));
        ranks.push(run);

        Some(Ladder {
            xs,
            ranks,
            total: run,
        })
    }

    /// Fraction of weight at or below `x`. `x` must not be NaN.
    #[inline]
    pub(crate) fn fraction_at(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        if x < self.xs[0] {
            return 0.0;
        }
        if x >= self.xs[last] {
            return 1.0;
        }
        // xs[0] <= x < xs[last], so 1 <= j <= last and xs[j-1] <= x < xs[j].
        let j = self.xs.partition_point(|&a| a <= x);
        let (x0, x1) = (self.xs[j - 1], self.xs[j]);
        let (r0, r1) = (self.ranks[j - 1], self.ranks[j]);
        let t = position(x, x0, x1);
        let r = if t.is_finite() { r0 + t * (r1 - r0) } else { r0 };
        (r / self.total).clamp(0.0, 1.0)
    }

    /// Value at which the ladder reaches fraction `q ∈ [0, 1]`.
    #[inline]
    pub(crate) fn value_at(&self, q: f64) -> f64 {
        let last = self.xs.len() - 1;
        if q <= 0.0 {
            return self.xs[0];
        }
        if q >= 1.0 {
            return self.xs[last];
        }
        let target = q * self.total;
        // ranks[0] = 0 < target < total = ranks[last].
        let j = self.ranks.partition_point(|&r| r < target).clamp(1, last);
        let (x0, x1) = (self.xs[j - 1], self.xs[j]);
        let (r0, r1) = (self.ranks[j - 1], self.ranks[j]);
        if r1 <= r0 {
            return x1;
        }
        let t = (target - r0) / (r1 - r0);
        // Rounding must not step outside the segment.
        lerp(x0, x1, t).clamp(x0, x1)
    }
}

/// Where `x` sits in `[x0, x1]` as a fraction. Anchors straddling zero near
/// `f64::MAX` overflow `x1 - x0`; those are measured at half scale.
#[inline]
fn position(x: f64, x0: f64, x1: f64) -> f64 {
    let span = x1 - x0;
    if span.is_finite() {
        (x - x0) / span
    } else {
        (x * 0.5 - x0 * 0.5) / (x1 * 0.5 - x0 * 0.5)
    }
}

/// Point at fraction `t` of `[x0, x1]`, without overflowing on a huge span.
#[inline]
fn lerp(x0: f64, x1: f64, t: f64) -> f64 {
    let span = x1 - x0;
    if span.is_finite() {
        x0 + t * span
    } else {
        (1.0 - t) * x0 + t * x1
    }
}
