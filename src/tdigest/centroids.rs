use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A centroid summarizes a cluster in the digest: the running mean of the
/// `weight` observations absorbed into it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid {
    mean: OrderedFloat<f64>,
    weight: OrderedFloat<f64>,
}

impl PartialOrd for Centroid {
    fn partial_cmp(&self, other: &Centroid) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Centroid {
    fn cmp(&self, other: &Centroid) -> Ordering {
        // A digest never holds two centroids with the same mean.
        self.mean.cmp(&other.mean)
    }
}

impl Centroid {
    /// `weight` must be finite and positive; callers validate it first.
    #[inline]
    pub(crate) fn new(mean: f64, weight: f64) -> Self {
        debug_assert!(weight > 0.0);
        Centroid {
            mean: OrderedFloat::from(mean),
            weight: OrderedFloat::from(weight),
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean.into_inner()
    }
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight.into_inner()
    }

    /// Fold `weight` observations at `x` into this centroid.
    ///
    /// The new mean lies between the old mean and `x`, so absorbing the
    /// nearest centroid's value never reorders the digest. It is formed as a
    /// convex combination, never from `x - mean`, which overflows for
    /// finite operands of opposite sign near `f64::MAX`.
    #[inline]
    pub fn absorb(&mut self, x: f64, weight: f64) {
        let w0 = self.weight.into_inner();
        let m0 = self.mean.into_inner();
        let new_w = w0 + weight;
        let mean = m0 * (w0 / new_w) + x * (weight / new_w);
        self.mean = OrderedFloat::from(mean.clamp(m0.min(x), m0.max(x)));
        self.weight = OrderedFloat::from(new_w);
    }
}

/// Strictly increasing by mean.
#[inline]
pub fn is_sorted_strict_by_mean(cs: &[Centroid]) -> bool {
    cs.windows(2).all(|w| w[0].mean() < w[1].mean())
}

/// Total weight of a centroid run.
#[inline]
pub(crate) fn total_weight(cs: &[Centroid]) -> f64 {
    cs.iter().map(Centroid::weight).sum()
}
