use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::{Statistics, slope};

/// Label enum with `as_str`/`Display`. Prefix with `iterable` to also get `ALL`.
macro_rules! label_enum {
    (iterable $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        label_enum!($name { $($variant => $text),+ });

        impl $name {
            pub(crate) const ALL: &[$name] = &[$($name::$variant),+];
        }
    };
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub(crate) enum $name {
            $($variant),+
        }

        impl $name {
            pub(crate) fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum!(iterable TemperatureBand {
    Low => "low",
    Normal => "normal",
    High => "high",
    Overheat => "overheat",
});

label_enum!(Variability {
    Stable => "stable",
    Moderate => "moderate",
    Unstable => "unstable",
});

label_enum!(Spread {
    Steady => "steady",
    Varying => "varying",
    Volatile => "volatile",
});

label_enum!(iterable Trend {
    Rising => "rising",
    Falling => "falling",
    Flat => "flat",
    Insufficient => "insufficient",
});

label_enum!(iterable Stability {
    VeryStable => "very_stable",
    Stable => "stable",
    Moderate => "moderate",
    Unstable => "unstable",
});

label_enum!(iterable AlertLevel {
    Normal => "normal",
    Watch => "watch",
    Warning => "warning",
    Danger => "danger",
});

impl TemperatureBand {
    pub(crate) fn classify(mean: f64) -> Self {
        if mean < 40.0 {
            TemperatureBand::Low
        } else if mean < 70.0 {
            TemperatureBand::Normal
        } else if mean < 85.0 {
            TemperatureBand::High
        } else {
            TemperatureBand::Overheat
        }
    }
}

impl Variability {
    pub(crate) fn classify(std: f64) -> Self {
        if std < 2.0 {
            Variability::Stable
        } else if std < 5.0 {
            Variability::Moderate
        } else {
            Variability::Unstable
        }
    }
}

impl Spread {
    pub(crate) fn classify(range: f64) -> Self {
        if range < 5.0 {
            Spread::Steady
        } else if range < 15.0 {
            Spread::Varying
        } else {
            Spread::Volatile
        }
    }
}

impl Trend {
    pub(crate) fn classify(values: &[f64]) -> Self {
        match slope(values) {
            None => Trend::Insufficient,
            Some(s) if s > 0.1 => Trend::Rising,
            Some(s) if s < -0.1 => Trend::Falling,
            Some(_) => Trend::Flat,
        }
    }
}

impl Stability {
    pub(crate) fn classify(stats: &Statistics) -> Self {
        let cv = stats.coefficient_of_variation();
        if cv < 0.05 {
            Stability::VeryStable
        } else if cv < 0.1 {
            Stability::Stable
        } else if cv < 0.2 {
            Stability::Moderate
        } else {
            Stability::Unstable
        }
    }
}

impl AlertLevel {
    pub(crate) fn classify(stats: &Statistics) -> Self {
        if stats.max > 90.0 || stats.mean > 85.0 {
            AlertLevel::Danger
        } else if stats.max > 80.0 || stats.mean > 75.0 {
            AlertLevel::Warning
        } else if stats.max > 70.0 || stats.mean > 65.0 {
            AlertLevel::Watch
        } else {
            AlertLevel::Normal
        }
    }

    /// Danger and warning batches are the ones operators must look at
    pub(crate) fn is_critical(self) -> bool {
        matches!(self, AlertLevel::Danger | AlertLevel::Warning)
    }
}

/// "{temperature}_{variability}_{spread}", e.g. `normal_stable_varying`
pub(crate) fn value_label(stats: &Statistics) -> String {
    format!(
        "{}_{}_{}",
        TemperatureBand::classify(stats.mean),
        Variability::classify(stats.std),
        Spread::classify(stats.range)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std: f64, min: f64, max: f64) -> Statistics {
        Statistics {
            mean,
            median: mean,
            std,
            min,
            max,
            range: max - min,
        }
    }

    #[test]
    fn temperature_band_boundaries() {
        assert_eq!(TemperatureBand::classify(39.9), TemperatureBand::Low);
        assert_eq!(TemperatureBand::classify(40.0), TemperatureBand::Normal);
        assert_eq!(TemperatureBand::classify(70.0), TemperatureBand::High);
        assert_eq!(TemperatureBand::classify(85.0), TemperatureBand::Overheat);
    }

    #[test]
    fn value_label_joins_three_parts() {
        assert_eq!(value_label(&stats(55.0, 1.0, 53.0, 57.0)), "normal_stable_steady");
        assert_eq!(value_label(&stats(88.0, 6.0, 70.0, 99.0)), "overheat_unstable_volatile");
        assert_eq!(value_label(&stats(72.0, 3.0, 65.0, 75.0)), "high_moderate_varying");
    }

    #[test]
    fn trend_from_slope() {
        assert_eq!(Trend::classify(&[50.0]), Trend::Insufficient);
        assert_eq!(Trend::classify(&[50.0, 51.0, 52.0]), Trend::Rising);
        assert_eq!(Trend::classify(&[52.0, 51.0, 50.0]), Trend::Falling);
        assert_eq!(Trend::classify(&[50.0, 50.05, 50.0]), Trend::Flat);
    }

    #[test]
    fn stability_from_cv() {
        assert_eq!(Stability::classify(&stats(50.0, 2.0, 45.0, 55.0)), Stability::VeryStable);
        assert_eq!(Stability::classify(&stats(50.0, 4.0, 45.0, 55.0)), Stability::Stable);
        assert_eq!(Stability::classify(&stats(50.0, 7.5, 45.0, 55.0)), Stability::Moderate);
        assert_eq!(Stability::classify(&stats(50.0, 20.0, 20.0, 80.0)), Stability::Unstable);
        assert_eq!(Stability::classify(&stats(0.0, 5.0, -5.0, 5.0)), Stability::VeryStable);
    }

    #[test]
    fn alert_level_uses_max_or_mean() {
        assert_eq!(AlertLevel::classify(&stats(60.0, 1.0, 55.0, 91.0)), AlertLevel::Danger);
        assert_eq!(AlertLevel::classify(&stats(86.0, 1.0, 84.0, 88.0)), AlertLevel::Danger);
        assert_eq!(AlertLevel::classify(&stats(76.0, 1.0, 74.0, 78.0)), AlertLevel::Warning);
        assert_eq!(AlertLevel::classify(&stats(60.0, 1.0, 55.0, 71.0)), AlertLevel::Watch);
        assert_eq!(AlertLevel::classify(&stats(55.0, 1.0, 50.0, 70.0)), AlertLevel::Normal);
    }

    #[test]
    fn critical_levels() {
        assert!(AlertLevel::Danger.is_critical());
        assert!(AlertLevel::Warning.is_critical());
        assert!(!AlertLevel::Watch.is_critical());
    }

    #[test]
    fn labels_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&Stability::VeryStable).unwrap(), "\"very_stable\"");
        let back: Trend = serde_json::from_str("\"insufficient\"").unwrap();
        assert_eq!(back, Trend::Insufficient);
        assert_eq!(AlertLevel::ALL.len(), 4);
    }
}
