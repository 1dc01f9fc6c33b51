use serde::{Deserialize, Serialize};

/// Descriptive statistics over one set of prices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation, 0 for a single value
    pub std_dev: f64,
}

impl PriceStats {
    /// `None` for an empty set
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        let std_dev = if n > 1 {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_stats() {
        assert_eq!(PriceStats::from_values(&[]), None);
    }

    #[test]
    fn test_single_value() {
        let stats = PriceStats::from_values(&[8000.0]).unwrap();
        assert_eq!(stats.mean, 8000.0);
        assert_eq!(stats.median, 8000.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_odd_and_even_medians() {
        let odd = PriceStats::from_values(&[9000.0, 7000.0, 8000.0]).unwrap();
        assert_eq!(odd.median, 8000.0);
        assert_eq!(odd.min, 7000.0);
        assert_eq!(odd.max, 9000.0);

        let even = PriceStats::from_values(&[1_300_000.0, 1_200_000.0]).unwrap();
        assert_eq!(even.median, 1_250_000.0);
        assert_eq!(even.mean, 1_250_000.0);
    }

    #[test]
    fn test_sample_std_dev() {
        // values 2,4,4,4,5,5,7,9: sample variance 32/7
        let stats =
            PriceStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.mean, 5.0);
    }
}
