//! Streaming t-digest.
//!
//! A [`Digest`] absorbs a stream of weighted observations into a bounded set
//! of centroids and answers approximate [`Digest::cdf`] and
//! [`Digest::quantile`] queries. Digests built on different partitions of a
//! stream combine with [`Digest::merge`].
//!
//! ```
//! use stream_tdigest::Digest;
//!
//! let mut d = Digest::new(0.01)?;
//! for i in 0..1_000 {
//!     d.add(i as f64)?;
//! }
//! let p = d.cdf(500.0)?;
//! assert!((p - 0.5).abs() < 0.01);
//! # Ok::<(), stream_tdigest::TdError>(())
//! ```
//!
//! [`quality`] scores a digest against a reference CDF and [`anomaly`] turns
//! CDF values into saturating tail scores.

pub mod anomaly;
pub mod error;
pub mod quality;
pub mod tdigest;

pub use anomaly::TailScorer;
pub use error::{TdError, TdResult};
pub use quality::QualityReport;
pub use tdigest::{par_build, Centroid, Digest, DigestBuilder, DigestOptions};
