//! Combining digests.
//!
//! A merge never needs raw data: the centroids of all inputs are pooled,
//! shuffled with the receiving digest's RNG and re-absorbed into an empty
//! centroid set under the receiving digest's compression. The result is an
//! approximation of sketching the union directly; swapping the arguments gives
//! a statistically equivalent but not bit-identical digest.

use rayon::prelude::*;
use tracing::debug;

use crate::tdigest::centroids::Centroid;
use crate::tdigest::compressor::reabsorb;
use crate::tdigest::{Digest, DigestOptions};
use crate::TdResult;

impl Digest {
    /// New digest over the observations of `self` and `other`, using `self`'s configuration.
    pub fn merge(&self, other: &Digest) -> Digest {
        let mut out = self.clone();
        out.merge_into(other);
        out
    }

    /// In-place form of [`Digest::merge`].
    pub fn merge_into(&mut self, other: &Digest) {
        if other.is_empty() {
            return;
        }
        let mut pooled: Vec<Centroid> =
            Vec::with_capacity(self.centroid_count() + other.centroid_count());
        pooled.extend_from_slice(self.centroids());
        pooled.extend_from_slice(other.centroids());
        self.absorb_stats(other);
        self.reabsorb_pooled(pooled, 2);
    }

    /// Fold many partial digests into one, taking the configuration of the
    /// first. `None` for an empty input.
    pub fn merge_all<I>(digests: I) -> Option<Digest>
    where
        I: IntoIterator<Item = Digest>,
    {
        let mut iter = digests.into_iter();
        let mut acc = iter.next()?;
        let mut pooled: Vec<Centroid> = acc.centroids().to_vec();
        let mut parts = 1usize;
        for d in iter {
            if d.is_empty() {
                continue;
            }
            pooled.extend_from_slice(d.centroids());
            acc.absorb_stats(&d);
            parts += 1;
        }
        if parts > 1 {
            acc.reabsorb_pooled(pooled, parts);
        }
        Some(acc)
    }

    fn reabsorb_pooled(&mut self, pooled: Vec<Centroid>, parts: usize) {
        let pooled_len = pooled.len();
        let mut rng = self.next_rng();
        let merged = reabsorb(pooled, self.compression(), &mut rng);
        self.set_centroids(merged);
        debug!(
            parts,
            pooled = pooled_len,
            after = self.centroid_count(),
            count = self.count(),
            "merged digests"
        );
        self.maybe_rebuild();
    }
}

/// Sketch `values` by splitting them into `chunk_len` partitions, building one
/// digest per partition on the rayon pool and merging the partials.
///
/// Partition `i` is seeded with `opts.seed + i`, so the result depends only on
/// the inputs, never on scheduling.
pub fn par_build(values: &[f64], opts: DigestOptions, chunk_len: usize) -> TdResult<Digest> {
    let empty = opts.build()?;
    let chunk_len = chunk_len.max(1);

    let partials = values
        .par_chunks(chunk_len)
        .enumerate()
        .map(|(i, chunk)| -> TdResult<Digest> {
            let mut d = DigestOptions {
                seed: opts.seed.wrapping_add(i as u64),
                ..opts
            }
            .build()?;
            d.update_many(chunk)?;
            Ok(d)
        })
        .collect::<TdResult<Vec<Digest>>>()?;

    Ok(Digest::merge_all(partials).unwrap_or(empty))
}
