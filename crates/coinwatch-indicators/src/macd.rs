//! Moving average convergence divergence.

use coinwatch_core::Column;

use crate::ema::{ema, ema_over_column};

/// MACD line and signal line.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    /// `ema(fast) - ema(slow)` per row.
    pub macd: Column,
    /// EMA of the MACD line, seeded on its first defined value.
    pub signal: Column,
}

/// Compute MACD(fast, slow) and its signal line over a close sequence.
pub fn macd_columns(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdOutput {
    if closes.is_empty() {
        return MacdOutput {
            macd: Column::undefined(0),
            signal: Column::undefined(0),
        };
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let macd_values: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let macd = Column::defined(macd_values);
    let signal = ema_over_column(&macd, signal_span);

    MacdOutput { macd, signal }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ema::ema_column;

    #[test]
    fn test_macd_is_ema_difference() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let out = macd_columns(&closes, 12, 26, 9);
        let ema12 = ema_column(&closes, 12);
        let ema26 = ema_column(&closes, 26);

        assert_eq!(out.macd.len(), closes.len());
        for i in 0..closes.len() {
            let expected = ema12.get(i).unwrap() - ema26.get(i).unwrap();
            let actual = out.macd.get(i).unwrap();
            assert!((actual - expected).abs() < 1e-12, "row {i}");
        }
    }

    #[test]
    fn test_signal_defined_from_first_macd_value() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = macd_columns(&closes, 12, 26, 9);

        // MACD is defined from row 0, so the signal is too.
        assert_eq!(out.signal.first_defined(), Some(0));
        assert_eq!(out.signal.get(0), out.macd.get(0));
    }

    #[test]
    fn test_constant_series_macd_zero() {
        let closes = vec![50.0; 40];
        let out = macd_columns(&closes, 12, 26, 9);
        for (_, v) in out.macd.iter_defined() {
            assert!(v.abs() < 1e-12);
        }
        for (_, v) in out.signal.iter_defined() {
            assert!(v.abs() < 1e-12);
        }
    }
}
