pub mod centroids;
pub mod cdf;
pub mod merges;
pub mod quantile;
#[cfg(test)]
pub(crate) mod test_helpers;

// Internal building blocks
mod compressor;
mod ladder;
mod scale;
mod tdigest;

// Public surface
pub use centroids::Centroid;
pub use merges::par_build;
pub use scale::{DEFAULT_COMPRESSION, DEFAULT_REBUILD_FACTOR};
pub use tdigest::{Digest, DigestBuilder, DigestOptions, DEFAULT_SEED};
