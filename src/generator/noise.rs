use std::f64::consts::PI;

use rand::Rng;

/// Normal sample via Box-Muller
pub(super) fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // 1 - [0, 1) keeps ln() away from zero
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

pub(super) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
