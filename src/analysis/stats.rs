use serde::{Deserialize, Serialize};

/// Descriptive statistics of one window (population standard deviation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Statistics {
    pub(crate) mean: f64,
    pub(crate) median: f64,
    pub(crate) std: f64,
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) range: f64,
}

impl Statistics {
    pub(crate) fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            median: median(values),
            std: variance.sqrt(),
            min,
            max,
            range: max - min,
        })
    }

    /// std / mean, or 0 when the mean is not positive
    pub(crate) fn coefficient_of_variation(&self) -> f64 {
        if self.mean > 0.0 {
            self.std / self.mean
        } else {
            0.0
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Least-squares slope of `values` against their index
pub(crate) fn slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    Some(num / den)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_has_no_statistics() {
        assert!(Statistics::from_values(&[]).is_none());
    }

    #[test]
    fn basic_statistics() {
        let s = Statistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.std, 2.0);
        assert_eq!(s.median, 4.5);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert_eq!(s.range, 7.0);
    }

    #[test]
    fn odd_median_and_single_value() {
        assert_eq!(Statistics::from_values(&[3.0, 1.0, 2.0]).unwrap().median, 2.0);
        let one = Statistics::from_values(&[50.0]).unwrap();
        assert_eq!(one.std, 0.0);
        assert_eq!(one.range, 0.0);
    }

    #[test]
    fn coefficient_of_variation_guards_non_positive_mean() {
        let s = Statistics::from_values(&[-1.0, 1.0]).unwrap();
        assert_eq!(s.coefficient_of_variation(), 0.0);
        let s = Statistics::from_values(&[45.0, 55.0]).unwrap();
        assert!(close(s.coefficient_of_variation(), 0.1));
    }

    #[test]
    fn slope_of_line() {
        assert!(close(slope(&[1.0, 3.0, 5.0, 7.0]).unwrap(), 2.0));
        assert!(close(slope(&[5.0, 5.0, 5.0]).unwrap(), 0.0));
        assert!(slope(&[1.0]).is_none());
    }
}
