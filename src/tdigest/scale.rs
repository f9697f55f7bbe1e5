//! Size bound that shapes the digest along the distribution.
//!
//! Compression is an **absolute** `δ` (typical values 0.01–0.1). A centroid
//! whose mid-rank sits at quantile `q` may hold at most `4·N·δ·q·(1−q)`
//! weight: tight near the tails, loose in the bulk. The digest is rebuilt
//! once it holds more than `ceil(K/δ)` centroids.

/// Default rebuild factor `K`.
pub const DEFAULT_REBUILD_FACTOR: f64 = 25.0;

/// Default compression `δ`.
pub const DEFAULT_COMPRESSION: f64 = 0.01;

/// Largest weight a centroid at quantile `q` may hold in a digest of total weight `n`.
#[inline]
pub(crate) fn size_bound(n: f64, q: f64, delta: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    4.0 * n * delta * q * (1.0 - q)
}

/// Centroid count above which the digest is rebuilt.
#[inline]
pub(crate) fn centroid_cap(rebuild_factor: f64, delta: f64) -> usize {
    let cap = (rebuild_factor / delta).ceil();
    if cap >= usize::MAX as f64 {
        usize::MAX
    } else {
        (cap as usize).max(1)
    }
}
