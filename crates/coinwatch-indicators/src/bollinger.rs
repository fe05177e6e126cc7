//! Bollinger bands.

use coinwatch_core::Column;

/// Rolling mean and ±k·σ envelope.
#[derive(Debug, Clone)]
pub struct BollingerOutput {
    pub mid: Column,
    pub upper: Column,
    pub lower: Column,
}

/// Bollinger(period, k) over a close sequence.
///
/// Uses the sample standard deviation (n − 1 denominator). Undefined until
/// `period` samples exist.
pub fn bollinger_columns(closes: &[f64], period: usize, k: f64) -> BollingerOutput {
    let len = closes.len();
    let mut mid: Vec<Option<f64>> = vec![None; len];
    let mut upper: Vec<Option<f64>> = vec![None; len];
    let mut lower: Vec<Option<f64>> = vec![None; len];

    if period >= 2 && len >= period {
        for row in (period - 1)..len {
            let window = &closes[row + 1 - period..=row];
            let mean: f64 = window.iter().sum::<f64>() / period as f64;
            let variance: f64 = window
                .iter()
                .map(|v| {
                    let d = v - mean;
                    d * d
                })
                .sum::<f64>()
                / (period as f64 - 1.0);
            let std = variance.sqrt();

            mid[row] = Some(mean);
            upper[row] = Some(mean + k * std);
            lower[row] = Some(mean - k * std);
        }
    }

    BollingerOutput {
        mid: Column::new(mid),
        upper: Column::new(upper),
        lower: Column::new(lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_until_period_samples() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = bollinger_columns(&closes, 20, 2.0);

        for i in 0..19 {
            assert_eq!(out.mid.get(i), None);
        }
        assert!(out.mid.get(19).is_some());
        assert_eq!(out.mid.len(), 30);
    }

    #[test]
    fn test_constant_series_bands_collapse() {
        let closes = vec![75.0; 25];
        let out = bollinger_columns(&closes, 20, 2.0);

        let mid = out.mid.last().unwrap();
        let upper = out.upper.last().unwrap();
        let lower = out.lower.last().unwrap();
        assert!((mid - 75.0).abs() < 1e-12);
        assert!((upper - 75.0).abs() < 1e-12);
        assert!((lower - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_bands_bracket_the_mean() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin() * 3.0).collect();
        let out = bollinger_columns(&closes, 20, 2.0);

        for i in 19..40 {
            let mid = out.mid.get(i).unwrap();
            let upper = out.upper.get(i).unwrap();
            let lower = out.lower.get(i).unwrap();
            assert!(upper >= mid && mid >= lower);
            // Symmetric envelope.
            assert!(((upper - mid) - (mid - lower)).abs() < 1e-9);
        }
    }
}
