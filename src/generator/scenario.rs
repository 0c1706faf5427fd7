use std::f64::consts::PI;

use chrono::{Duration, NaiveDateTime, Timelike};
use clap::ValueEnum;
use rand::Rng;

use super::noise::{gaussian, round1};
use crate::telemetry::Reading;

/// Operating pattern to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Scenario {
    /// Daily cycle around 55 °C
    Normal,
    /// Steady climb toward 90 °C with growing jitter
    Overheating,
    /// Stopped, warm-up, then stabilization
    Maintenance,
    /// Production-load cycle with a sudden spike
    #[value(alias = "load_variation")]
    LoadVariation,
    /// Multi-day drift on top of the daily cycle, 30-minute interval
    Seasonal,
    /// Two days of normal, overheating, maintenance and load variation
    Combined,
}

const INTERVAL_MINUTES: i64 = 10;
const SEASONAL_INTERVAL_MINUTES: i64 = 30;
const COMBINED_SPAN_HOURS: i64 = 48;

impl Scenario {
    /// First timestamp for a run ending around `now`
    pub(crate) fn default_start(self, now: NaiveDateTime, duration_hours: u32) -> NaiveDateTime {
        match self {
            Scenario::Combined => now - Duration::hours(COMBINED_SPAN_HOURS),
            _ => now - Duration::hours(i64::from(duration_hours)),
        }
    }

    /// Readings sorted by time. `duration_hours` is ignored by `Combined`.
    pub(crate) fn generate<R: Rng + ?Sized>(
        self,
        start: NaiveDateTime,
        duration_hours: u32,
        rng: &mut R,
    ) -> Vec<Reading> {
        let hours = i64::from(duration_hours);
        let mut readings = match self {
            Scenario::Normal => normal(start, hours, rng),
            Scenario::Overheating => overheating(start, hours, rng),
            Scenario::Maintenance => maintenance(start, hours, rng),
            Scenario::LoadVariation => load_variation(start, hours, rng),
            Scenario::Seasonal => seasonal(start, (hours / 24).max(1), rng),
            Scenario::Combined => {
                let mut all = normal(start, 20, rng);
                all.extend(overheating(start + Duration::hours(20), 4, rng));
                all.extend(maintenance(start + Duration::hours(24), 8, rng));
                all.extend(load_variation(start + Duration::hours(32), 16, rng));
                all
            }
        };
        readings.sort_by_key(|r| r.timestamp);
        readings
    }
}

/// Sample `temperature(timestamp, elapsed_hours)` every `interval` until `span` has passed
fn series<F>(start: NaiveDateTime, span: Duration, interval_minutes: i64, mut temperature: F) -> Vec<Reading>
where
    F: FnMut(NaiveDateTime, f64) -> f64,
{
    let end = start + span;
    let step = Duration::minutes(interval_minutes);
    let mut readings = Vec::new();
    let mut current = start;
    while current < end {
        let elapsed = (current - start).num_seconds() as f64 / 3600.0;
        readings.push(Reading {
            timestamp: current,
            value: round1(temperature(current, elapsed)),
        });
        current += step;
    }
    readings
}

fn daily_cycle(at: NaiveDateTime, amplitude: f64) -> f64 {
    amplitude * ((f64::from(at.hour()) - 6.0) * PI / 12.0).sin()
}

fn normal<R: Rng + ?Sized>(start: NaiveDateTime, hours: i64, rng: &mut R) -> Vec<Reading> {
    series(start, Duration::hours(hours), INTERVAL_MINUTES, |at, _| {
        (55.0 + daily_cycle(at, 5.0) + gaussian(rng, 0.0, 2.0)).clamp(35.0, 75.0)
    })
}

fn overheating<R: Rng + ?Sized>(start: NaiveDateTime, hours: i64, rng: &mut R) -> Vec<Reading> {
    series(start, Duration::hours(hours), INTERVAL_MINUTES, |_, h| {
        let rise = (h * 8.0).min(30.0);
        (60.0 + rise + gaussian(rng, 0.0, 3.0 + h)).clamp(40.0, 100.0)
    })
}

fn maintenance<R: Rng + ?Sized>(start: NaiveDateTime, hours: i64, rng: &mut R) -> Vec<Reading> {
    series(start, Duration::hours(hours), INTERVAL_MINUTES, |_, h| {
        let temp = if h < 1.0 {
            25.0 + gaussian(rng, 0.0, 2.0)
        } else if h < 2.0 {
            25.0 + (h - 1.0) * 30.0 + gaussian(rng, 0.0, 5.0)
        } else {
            let settled = ((h - 2.0) / 2.0).min(1.0);
            55.0 + gaussian(rng, 0.0, 2.0 + (1.0 - settled) * 10.0)
        };
        temp.clamp(20.0, 80.0)
    })
}

fn load_variation<R: Rng + ?Sized>(start: NaiveDateTime, hours: i64, rng: &mut R) -> Vec<Reading> {
    series(start, Duration::hours(hours), INTERVAL_MINUTES, |_, h| {
        let mut load = 0.5 + 0.4 * (h * PI / 4.0).sin();
        if h > 6.0 && h < 7.0 {
            load += 0.3;
        }
        (50.0 + load * 25.0 + gaussian(rng, 0.0, 2.0 + load * 3.0)).clamp(30.0, 90.0)
    })
}

fn seasonal<R: Rng + ?Sized>(start: NaiveDateTime, days: i64, rng: &mut R) -> Vec<Reading> {
    series(start, Duration::days(days), SEASONAL_INTERVAL_MINUTES, |at, h| {
        let drift = h / 24.0 * 2.0;
        (52.0 + daily_cycle(at, 8.0) + drift + gaussian(rng, 0.0, 3.0)).clamp(35.0, 80.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 13)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn values(readings: &[Reading]) -> impl Iterator<Item = f64> + '_ {
        readings.iter().map(|r| r.value)
    }

    #[test]
    fn combined_has_288_readings_over_two_days() {
        let mut rng = StdRng::seed_from_u64(7);
        let readings = Scenario::Combined.generate(start(), 1, &mut rng);
        assert_eq!(readings.len(), 288);
        assert_eq!(readings[0].timestamp, start());
        assert_eq!(
            readings[287].timestamp,
            start() + Duration::hours(48) - Duration::minutes(10)
        );
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn interval_and_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Scenario::Normal.generate(start(), 24, &mut rng).len(), 144);
        assert_eq!(Scenario::Overheating.generate(start(), 4, &mut rng).len(), 24);
        // seasonal: 48 h -> 2 days at 30-minute steps
        assert_eq!(Scenario::Seasonal.generate(start(), 48, &mut rng).len(), 96);
        // less than a day still yields one day
        assert_eq!(Scenario::Seasonal.generate(start(), 5, &mut rng).len(), 48);
    }

    #[test]
    fn values_stay_clamped_and_rounded() {
        let mut rng = StdRng::seed_from_u64(99);
        let cases = [
            (Scenario::Normal, 35.0, 75.0),
            (Scenario::Overheating, 40.0, 100.0),
            (Scenario::Maintenance, 20.0, 80.0),
            (Scenario::LoadVariation, 30.0, 90.0),
            (Scenario::Seasonal, 35.0, 80.0),
        ];
        for (scenario, lo, hi) in cases {
            for v in values(&scenario.generate(start(), 48, &mut rng)) {
                assert!((lo..=hi).contains(&v), "{scenario:?} produced {v}");
                assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn maintenance_starts_cold() {
        let mut rng = StdRng::seed_from_u64(5);
        let readings = Scenario::Maintenance.generate(start(), 8, &mut rng);
        let first_hour: Vec<f64> = values(&readings[..6]).collect();
        assert!(first_hour.iter().all(|&v| v < 40.0));
    }

    #[test]
    fn seeded_output_is_deterministic() {
        let a = Scenario::Combined.generate(start(), 48, &mut StdRng::seed_from_u64(3));
        let b = Scenario::Combined.generate(start(), 48, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn default_start_per_scenario() {
        let now = start() + Duration::days(10);
        assert_eq!(Scenario::Combined.default_start(now, 6), now - Duration::hours(48));
        assert_eq!(Scenario::Normal.default_start(now, 6), now - Duration::hours(6));
    }

    #[test]
    fn load_variation_alias_parses() {
        assert_eq!(
            Scenario::from_str("load_variation", false).unwrap(),
            Scenario::LoadVariation
        );
        assert_eq!(
            Scenario::from_str("load-variation", false).unwrap(),
            Scenario::LoadVariation
        );
    }
}
