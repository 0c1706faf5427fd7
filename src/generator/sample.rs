use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use super::noise::gaussian;
use crate::telemetry::Reading;

const SAMPLE_SIZE: usize = 500;
const PHASE_LEN: usize = 100;

/// (mean, std) per block of 100 readings: normal, load rise, hot, overheating, recovery
const PHASES: [(f64, f64); 5] = [(45.0, 2.0), (60.0, 3.0), (75.0, 5.0), (85.0, 4.0), (50.0, 2.0)];

/// Built-in demo data: 500 readings every 10 minutes from `start`
pub(crate) fn sample_readings<R: Rng + ?Sized>(start: NaiveDateTime, rng: &mut R) -> Vec<Reading> {
    (0..SAMPLE_SIZE)
        .map(|i| {
            let (mean, std_dev) = PHASES[(i / PHASE_LEN).min(PHASES.len() - 1)];
            Reading {
                timestamp: start + Duration::minutes(10 * i as i64),
                value: gaussian(rng, mean, std_dev).clamp(20.0, 100.0),
            }
        })
        .collect()
}
