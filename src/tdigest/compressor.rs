//! Absorption kernel shared by `update`, rebuilds and merges.
//!
//! One incoming `(x, w)` either folds into its nearest centroid, when the
//! centroid's size bound allows it, or becomes a new centroid at its sorted
//! position. Rebuilds and merges shuffle an existing centroid set and feed it
//! back through the same rule, one centroid at a time.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::tdigest::centroids::{total_weight, Centroid};
use crate::tdigest::scale::size_bound;

/// Where an absorbed observation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Folded into the existing centroid at this index.
    Merged(usize),
    /// Inserted as a new centroid at this index.
    Inserted(usize),
}

/// Absorb `(x, w)` into `cs`, where `n` is the digest's total weight **including** `w`.
///
/// Tie-break: when `x` is equidistant from both neighbours, the eligible one
/// with the lower current weight wins; the left one on equal weight.
pub(crate) fn absorb(cs: &mut Vec<Centroid>, n: f64, delta: f64, x: f64, w: f64) -> Placement {
    let idx = cs.partition_point(|c| c.mean() < x);

    // Equal means are always merged so means stay strictly ascending.
    if idx < cs.len() && cs[idx].mean() == x {
        cs[idx].absorb(x, w);
        return Placement::Merged(idx);
    }

    let left = idx.checked_sub(1);
    let right = (idx < cs.len()).then_some(idx);
    let candidates = match (left, right) {
        (Some(l), Some(r)) => {
            let dl = x - cs[l].mean();
            let dr = cs[r].mean() - x;
            if dl < dr {
                [Some(l), None]
            } else if dr < dl {
                [Some(r), None]
            } else {
                [Some(l), Some(r)]
            }
        }
        (l, r) => [l.or(r), None],
    };

    // Cumulative weight in front of the first candidate; the second (if any) is its right neighbour.
    let first = match candidates[0] {
        Some(i) => i,
        None => {
            cs.insert(idx, Centroid::new(x, w));
            return Placement::Inserted(idx);
        }
    };
    let mut before = total_weight(&cs[..first]);

    let mut chosen: Option<usize> = None;
    for i in candidates.into_iter().flatten() {
        let c = cs[i];
        let q = (before + c.weight() / 2.0) / n;
        let eligible = c.weight() + w <= size_bound(n, q, delta);
        let lighter = chosen.map_or(true, |j| c.weight() < cs[j].weight());
        if eligible && lighter {
            chosen = Some(i);
        }
        before += c.weight();
    }

    match chosen {
        Some(i) => {
            cs[i].absorb(x, w);
            Placement::Merged(i)
        }
        None => {
            cs.insert(idx, Centroid::new(x, w));
            Placement::Inserted(idx)
        }
    }
}

/// Shuffle `items` and re-absorb them, in that order, into a fresh centroid set.
pub(crate) fn reabsorb(mut items: Vec<Centroid>, delta: f64, rng: &mut StdRng) -> Vec<Centroid> {
    items.shuffle(rng);
    let mut out: Vec<Centroid> = Vec::with_capacity(items.len());
    let mut running = 0.0_f64;
    for c in items {
        running += c.weight();
        absorb(&mut out, running, delta, c.mean(), c.weight());
    }
    out
}
