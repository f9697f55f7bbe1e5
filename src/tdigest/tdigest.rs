// src/tdigest/tdigest.rs
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ensure_finite, ensure_positive};
use crate::tdigest::centroids::{is_sorted_strict_by_mean, total_weight, Centroid};
use crate::tdigest::compressor::{absorb, reabsorb, Placement};
use crate::tdigest::scale::{centroid_cap, DEFAULT_COMPRESSION, DEFAULT_REBUILD_FACTOR};
use crate::{TdError, TdResult};

/// Seed used when none is configured; keeps digest contents reproducible.
pub const DEFAULT_SEED: u64 = 0x7d16_e57a_5eed_0001;

/// Streaming t-digest: an ordered, size-bounded set of weighted centroids
/// approximating the CDF of everything passed to [`Digest::update`].
///
/// - Means are strictly ascending at all times; equal values share a centroid.
/// - `count` is the exact total absorbed weight.
/// - `min`/`max` are the exact observed extremes (`NaN` while empty).
/// - Rebuilds and merges shuffle with an RNG derived from `seed` and the
///   rebuild counter, so the same inputs always give the same centroids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DigestState", into = "DigestState")]
pub struct Digest {
    centroids: Vec<Centroid>,
    compression: f64,
    rebuild_factor: f64,
    count: f64,
    min: f64,
    max: f64,
    seed: u64,
    rebuilds: u64,
}

impl Default for Digest {
    fn default() -> Self {
        Digest::empty(DigestOptions::default())
    }
}

/* =============================================================================
 * Options / Builder
 * ============================================================================= */

/// Plain configuration value for a [`Digest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigestOptions {
    /// Absolute compression `δ > 0`; smaller keeps more centroids.
    pub compression: f64,
    /// `K` in the rebuild threshold `ceil(K/δ)` centroids.
    pub rebuild_factor: f64,
    /// Seed for the shuffles used by rebuilds and merges.
    pub seed: u64,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            compression: DEFAULT_COMPRESSION,
            rebuild_factor: DEFAULT_REBUILD_FACTOR,
            seed: DEFAULT_SEED,
        }
    }
}

impl DigestOptions {
    pub fn validate(&self) -> TdResult<()> {
        ensure_positive("compression", self.compression)?;
        ensure_positive("rebuild factor", self.rebuild_factor)?;
        Ok(())
    }

    /// Build an empty digest with these options.
    pub fn build(self) -> TdResult<Digest> {
        self.validate()?;
        Ok(Digest::empty(self))
    }
}

/// Builder for [`Digest`].
#[derive(Debug, Clone, Default)]
pub struct DigestBuilder {
    opts: DigestOptions,
}

impl DigestBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute compression `δ`.
    #[inline]
    pub fn compression(mut self, delta: f64) -> Self {
        self.opts.compression = delta;
        self
    }

    /// Set the rebuild factor `K`.
    #[inline]
    pub fn rebuild_factor(mut self, k: f64) -> Self {
        self.opts.rebuild_factor = k;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.opts.seed = seed;
        self
    }

    #[inline]
    pub fn options(&self) -> DigestOptions {
        self.opts
    }

    /// Build an empty digest; fails on a non-positive compression or rebuild factor.
    pub fn build(self) -> TdResult<Digest> {
        self.opts.build()
    }
}

/* =============================================================================
 * Digest
 * ============================================================================= */

impl Digest {
    /// Empty digest with compression `δ` and default settings otherwise.
    pub fn new(compression: f64) -> TdResult<Digest> {
        DigestBuilder::new().compression(compression).build()
    }

    /// Entry point for fluent construction.
    #[inline]
    pub fn builder() -> DigestBuilder {
        DigestBuilder::default()
    }

    /// Build from a slice of unit-weight observations.
    pub fn from_slice(values: &[f64], compression: f64) -> TdResult<Digest> {
        let mut d = Digest::new(compression)?;
        d.update_many(values)?;
        Ok(d)
    }

    pub(crate) fn empty(opts: DigestOptions) -> Digest {
        Digest {
            centroids: Vec::new(),
            compression: opts.compression,
            rebuild_factor: opts.rebuild_factor,
            count: 0.0,
            min: f64::NAN,
            max: f64::NAN,
            seed: opts.seed,
            rebuilds: 0,
        }
    }

    /// Add one observation with unit weight.
    #[inline]
    pub fn add(&mut self, x: f64) -> TdResult<()> {
        self.update(x, 1.0)
    }

    /// Add one observation of `weight`.
    ///
    /// Fails with [`TdError::InvalidArgument`] if `x` is not finite or
    /// `weight` is not finite and positive; the digest is left untouched.
    pub fn update(&mut self, x: f64, weight: f64) -> TdResult<()> {
        ensure_finite("sample value", x)?;
        ensure_positive("sample weight", weight)?;
        self.absorb_checked(x, weight);
        Ok(())
    }

    /// Add unit-weight observations in order. The whole batch is validated
    /// first, so a bad value leaves the digest unchanged.
    pub fn update_many(&mut self, values: &[f64]) -> TdResult<()> {
        if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(TdError::invalid("sample value", bad, "a finite number"));
        }
        for &x in values {
            self.absorb_checked(x, 1.0);
        }
        Ok(())
    }

    fn absorb_checked(&mut self, x: f64, weight: f64) {
        self.min = self.min.min(x);
        self.max = self.max.max(x);
        self.count += weight;
        if let Placement::Inserted(at) =
            absorb(&mut self.centroids, self.count, self.compression, x, weight)
        {
            trace!(x, weight, at, centroids = self.centroids.len(), "new centroid");
        }
        self.maybe_rebuild();
    }

    /// Rebuild if the centroid count has outgrown `ceil(K/δ)`.
    pub(crate) fn maybe_rebuild(&mut self) {
        if self.centroids.len() > self.centroid_cap() {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let before = self.centroids.len();
        let mut rng = self.next_rng();
        let items = std::mem::take(&mut self.centroids);
        self.centroids = reabsorb(items, self.compression, &mut rng);
        debug!(
            before,
            after = self.centroids.len(),
            count = self.count,
            rebuilds = self.rebuilds,
            "rebuilt digest"
        );
    }

    /// Fresh shuffle RNG; every call advances the rebuild counter.
    pub(crate) fn next_rng(&mut self) -> StdRng {
        let stream = self.rebuilds.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        self.rebuilds = self.rebuilds.wrapping_add(1);
        StdRng::seed_from_u64(self.seed ^ stream)
    }

    pub(crate) fn options(&self) -> DigestOptions {
        DigestOptions {
            compression: self.compression,
            rebuild_factor: self.rebuild_factor,
            seed: self.seed,
        }
    }

    pub(crate) fn set_centroids(&mut self, cs: Vec<Centroid>) {
        debug_assert!(is_sorted_strict_by_mean(&cs), "centroids out of order");
        self.centroids = cs;
    }

    pub(crate) fn absorb_stats(&mut self, other: &Digest) {
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /* ===========================
     * Accessors
     * =========================== */

    /// Total absorbed weight (the observation count for unit updates).
    #[inline]
    pub fn count(&self) -> f64 {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    #[inline]
    pub fn compression(&self) -> f64 {
        self.compression
    }

    #[inline]
    pub fn rebuild_factor(&self) -> f64 {
        self.rebuild_factor
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Centroid count that triggers a rebuild once exceeded.
    #[inline]
    pub fn centroid_cap(&self) -> usize {
        centroid_cap(self.rebuild_factor, self.compression)
    }

    #[inline]
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    #[inline]
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Smallest observed value (`NaN` when empty).
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest observed value (`NaN` when empty).
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Weighted mean of everything absorbed (`NaN` when empty).
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        // Running weighted mean; a plain sum of `mean * weight` overflows
        // near `f64::MAX`.
        let mut acc = self.centroids[0];
        for c in &self.centroids[1..] {
            acc.absorb(c.mean(), c.weight());
        }
        acc.mean()
    }
}

/* =============================================================================
 * Serialized form
 * ============================================================================= */

/// Field-for-field image of a [`Digest`]; converting back re-checks every invariant.
#[derive(Serialize, Deserialize)]
struct DigestState {
    centroids: Vec<Centroid>,
    compression: f64,
    rebuild_factor: f64,
    count: f64,
    min: f64,
    max: f64,
    seed: u64,
    rebuilds: u64,
}

impl From<Digest> for DigestState {
    fn from(d: Digest) -> Self {
        DigestState {
            centroids: d.centroids,
            compression: d.compression,
            rebuild_factor: d.rebuild_factor,
            count: d.count,
            min: d.min,
            max: d.max,
            seed: d.seed,
            rebuilds: d.rebuilds,
        }
    }
}

impl TryFrom<DigestState> for Digest {
    type Error = TdError;

    fn try_from(s: DigestState) -> TdResult<Digest> {
        ensure_positive("compression", s.compression)?;
        ensure_positive("rebuild factor", s.rebuild_factor)?;

        if s.centroids.is_empty() {
            if s.count != 0.0 {
                return Err(TdError::Invariant {
                    what: "empty digest with non-zero count",
                });
            }
        } else {
            if s
                .centroids
                .iter()
                .any(|c| !c.mean().is_finite() || !(c.weight().is_finite() && c.weight() > 0.0))
            {
                return Err(TdError::Invariant {
                    what: "centroid with non-finite mean or non-positive weight",
                });
            }
            if !is_sorted_strict_by_mean(&s.centroids) {
                return Err(TdError::Invariant {
                    what: "centroid means not strictly ascending",
                });
            }
            let first = s.centroids[0].mean();
            let last = s.centroids[s.centroids.len() - 1].mean();
            if !(s.min <= first && last <= s.max) {
                return Err(TdError::Invariant {
                    what: "min/max do not enclose the centroid means",
                });
            }
            let w = total_weight(&s.centroids);
            if (w - s.count).abs() > 1e-9 * w.max(1.0) {
                return Err(TdError::Invariant {
                    what: "count differs from total centroid weight",
                });
            }
        }

        Ok(Digest {
            centroids: s.centroids,
            compression: s.compression,
            rebuild_factor: s.rebuild_factor,
            count: s.count,
            min: s.min,
            max: s.max,
            seed: s.seed,
            rebuilds: s.rebuilds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tdigest::test_helpers::assert_exact;

    #[test]
    fn new_rejects_non_positive_compression() {
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = Digest::new(bad).unwrap_err();
            assert!(err.is_invalid_argument(), "{bad}: {err}");
        }
        assert!(Digest::builder().rebuild_factor(0.0).build().is_err());
    }

    #[test]
    fn empty_digest_has_nan_stats() {
        let d = Digest::new(0.1).expect("valid");
        assert!(d.is_empty());
        assert_eq!(d.count(), 0.0);
        assert!(d.min().is_nan() && d.max().is_nan() && d.mean().is_nan());
    }

    #[test]
    fn update_rejects_bad_input_and_leaves_state_untouched() {
        let mut d = Digest::new(0.1).expect("valid");
        d.add(1.0).expect("finite");
        let before = d.clone();

        assert!(d.update(f64::NAN, 1.0).is_err());
        assert!(d.update(f64::INFINITY, 1.0).is_err());
        assert!(d.update(2.0, 0.0).is_err());
        assert!(d.update(2.0, -1.0).is_err());
        assert!(d.update(2.0, f64::NAN).is_err());
        assert!(d.update_many(&[3.0, f64::NEG_INFINITY]).is_err());
        assert_eq!(d, before);

        d.add(2.0).expect("still usable");
        assert_eq!(d.count(), 2.0);
    }

    #[test]
    fn weighted_updates_conserve_mass_and_mean() {
        let mut d = Digest::new(0.05).expect("valid");
        d.update(1.0, 2.5).expect("ok");
        d.update(3.0, 0.5).expect("ok");
        d.update(1.0, 1.0).expect("ok");
        assert_exact("count", 4.0, d.count());
        assert!((d.mean() - 1.25).abs() < 1e-12);
        assert_eq!(d.centroid_count(), 2, "ties share a centroid");
    }

    #[test]
    fn extreme_magnitudes_keep_every_query_finite() {
        // δ = 2 lets the huge positive value fold into the huge negative centroid.
        let mut d = Digest::new(2.0).expect("valid");
        d.update(-1.7e308, 1_000.0).expect("finite");
        d.update(1.7e308, 1.0).expect("finite");
        assert!(d.centroids().iter().all(|c| c.mean().is_finite()));
        assert!(d.mean().is_finite());
        for q in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let x = d.quantile(q).expect("valid q");
            assert!(x.is_finite(), "quantile({q}) = {x}");
        }

        let wide = Digest::from_slice(&[-1.7e308, 1.7e308], 0.1).expect("finite");
        let mid = wide.quantile(0.5).expect("valid q");
        assert!(mid.abs() <= 1e292, "quantile(0.5) = {mid}");
        assert!((wide.cdf(mid).expect("ok") - 0.5).abs() < 1e-12);
        assert!((wide.cdf(0.0).expect("ok") - 0.5).abs() < 1e-12);
        assert!(wide.mean().abs() <= 1e292);
    }

    #[test]
    fn repeated_value_stays_single_centroid() {
        let mut d = Digest::new(0.01).expect("valid");
        for _ in 0..1_000 {
            d.add(42.0).expect("ok");
        }
        assert_eq!(d.centroid_count(), 1);
        assert_exact("count", 1_000.0, d.count());
        assert_exact("min", 42.0, d.min());
        assert_exact("max", 42.0, d.max());
    }

    #[test]
    fn same_seed_same_centroids() {
        let xs: Vec<f64> = (0..5_000).map(|i| ((i * 7_919) % 5_003) as f64).collect();
        let a = Digest::from_slice(&xs, 0.1).expect("ok");
        let b = Digest::from_slice(&xs, 0.1).expect("ok");
        assert_eq!(a, b);
    }

    #[test]
    fn rebuild_keeps_centroids_under_cap_for_sorted_input() {
        let mut d = Digest::new(0.1).expect("valid");
        for i in 0..20_000 {
            d.add(i as f64).expect("ok");
            assert!(d.centroid_count() <= 2 * d.centroid_cap());
        }
        assert!(is_sorted_strict_by_mean(d.centroids()));
        assert_exact("count", 20_000.0, d.count());
    }

    #[test]
    fn serde_state_rejects_unsorted_centroids() {
        let mut state = DigestState::from(Digest::from_slice(&[1.0, 2.0], 0.1).expect("ok"));
        state.centroids.reverse();
        let err = Digest::try_from(state).unwrap_err();
        assert_eq!(
            err,
            TdError::Invariant {
                what: "centroid means not strictly ascending"
            }
        );
    }

    #[test]
    fn serde_state_round_trips_a_valid_digest() {
        let d = Digest::from_slice(&[5.0, 1.0, 3.0, 3.0], 0.1).expect("ok");
        let back = Digest::try_from(DigestState::from(d.clone())).expect("valid state");
        assert_eq!(back, d);
    }
}
