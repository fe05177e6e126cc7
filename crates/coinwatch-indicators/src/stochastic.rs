//! Stochastic oscillator.

use coinwatch_core::{Bar, Column};

/// %K and %D lines.
#[derive(Debug, Clone)]
pub struct StochasticOutput {
    pub k: Column,
    pub d: Column,
}

/// Stochastic(k_period, d_period) over OHLCV bars.
///
/// `%K = 100 · (close − L) / (H − L)` with L/H the rolling k_period low/high.
/// A flat window (`H == L`) yields an undefined row rather than a division
/// by zero. `%D` is the d_period simple mean of `%K`, defined only where the
/// whole trailing window of `%K` is.
pub fn stochastic_columns(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticOutput {
    let len = bars.len();
    let mut k: Vec<Option<f64>> = vec![None; len];

    if k_period >= 1 && len >= k_period {
        for row in (k_period - 1)..len {
            let window = &bars[row + 1 - k_period..=row];
            let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let high = window
                .iter()
                .map(|b| b.high)
                .fold(f64::NEG_INFINITY, f64::max);

            if high > low {
                k[row] = Some(100.0 * (bars[row].close - low) / (high - low));
            }
        }
    }

    let k = Column::new(k);

    let mut d: Vec<Option<f64>> = vec![None; len];
    if d_period >= 1 {
        for row in (d_period.saturating_sub(1))..len {
            let window: Vec<f64> = (row + 1 - d_period..=row)
                .map(|i| k.get(i))
                .collect::<Option<Vec<f64>>>()
                .unwrap_or_default();
            if window.len() == d_period {
                d[row] = Some(window.iter().sum::<f64>() / d_period as f64);
            }
        }
    }

    StochasticOutput {
        k,
        d: Column::new(d),
    }
}
