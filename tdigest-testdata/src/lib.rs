//! tdigest-testdata
//! Seeded synthetic datasets shared by benches and tests, plus closed-form
//! CDFs for the distributions that have one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};

/// Available synthetic distributions.
#[derive(Clone, Copy, Debug)]
pub enum DistKind {
    /// Uniform in \[0,1)
    Uniform,
    /// Gamma with unit scale
    Gamma { shape: f64 },
    /// Standard normal
    Normal,
    /// Clumps, a broad region and heavy tails on both sides
    Mixture,
}

/// Generate `n` samples of `kind` from a `StdRng` seeded with `seed`.
///
/// Panics on a non-positive gamma shape.
pub fn gen_dataset(kind: DistKind, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    match kind {
        DistKind::Uniform => (0..n).map(|_| rng.random::<f64>()).collect(),
        DistKind::Gamma { shape } => {
            let gamma = Gamma::new(shape, 1.0).expect("gamma shape must be > 0");
            (0..n).map(|_| gamma.sample(&mut rng)).collect()
        }
        DistKind::Normal => {
            let normal = Normal::new(0.0, 1.0).expect("unit normal");
            (0..n).map(|_| normal.sample(&mut rng)).collect()
        }
        DistKind::Mixture => (0..n).map(|_| mixture_draw(&mut rng)).collect(),
    }
}

fn mixture_draw(rng: &mut StdRng) -> f64 {
    match rng.random_range(0..100u32) {
        // Clumps around -1, 0, 1 with micro-noise
        0..=29 => {
            let center = match rng.random_range(0..3) {
                0 => -1.0,
                1 => 0.0,
                _ => 1.0,
            };
            center + rng.random_range(-1.0..1.0) * 1e-3
        }
        // Broad uniform region
        30..=79 => rng.random_range(-10.0..10.0),
        // Heavy tails out to 1e6
        _ => {
            let mag = 10f64.powf(rng.random_range(1.0..6.0));
            if rng.random_bool(0.5) {
                mag
            } else {
                -mag
            }
        }
    }
}

/// Closed-form CDF of `kind` at `x`, where one is cheap to write down.
pub fn reference_cdf(kind: DistKind, x: f64) -> Option<f64> {
    match kind {
        DistKind::Uniform => Some(x.clamp(0.0, 1.0)),
        DistKind::Gamma { shape } if shape == 1.0 => Some(gamma1_cdf(x)),
        _ => None,
    }
}

/// CDF of Gamma(1) (the unit exponential).
pub fn gamma1_cdf(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        -(-x).exp_m1()
    }
}
