//! Exponential moving average.

use coinwatch_core::Column;

/// Recursive EMA over a fully-defined price sequence.
///
/// `alpha = 2 / (span + 1)`, seeded with the first price, so the output is
/// defined at every index.
pub fn ema(prices: &[f64], span: usize) -> Vec<f64> {
    if prices.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len());
    values.push(prices[0]);

    for &price in &prices[1..] {
        let prev = values[values.len() - 1];
        values.push(alpha * price + (1.0 - alpha) * prev);
    }

    values
}

/// EMA as a series-aligned column.
pub fn ema_column(prices: &[f64], span: usize) -> Column {
    Column::defined(ema(prices, span))
}

/// EMA over an already-computed column, seeded on its first defined value.
///
/// Undefined input rows stay undefined in the output; the recursion starts
/// at the column's first defined index.
pub fn ema_over_column(input: &Column, span: usize) -> Column {
    let len = input.len();
    let Some(start) = input.first_defined() else {
        return Column::undefined(len);
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut values: Vec<Option<f64>> = vec![None; len];
    let mut prev = match input.get(start) {
        Some(v) => v,
        None => return Column::undefined(len),
    };
    values[start] = Some(prev);

    for (i, value) in values.iter_mut().enumerate().skip(start + 1) {
        if let Some(current) = input.get(i) {
            prev = alpha * current + (1.0 - alpha) * prev;
            *value = Some(prev);
        }
    }

    Column::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_is_identity() {
        let prices = vec![42.0; 50];
        for span in [12, 26, 100, 200] {
            let values = ema(&prices, span);
            assert_eq!(values.len(), 50);
            for v in values {
                assert!((v - 42.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_seeded_with_first_price() {
        let prices = vec![10.0, 20.0];
        let values = ema(&prices, 12);
        assert_eq!(values[0], 10.0);
        // alpha = 2/13
        let alpha = 2.0 / 13.0;
        assert!((values[1] - (alpha * 20.0 + (1.0 - alpha) * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_tracks_monotone_series() {
        let prices: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let values = ema(&prices, 12);
        // EMA lags a rising series but keeps rising.
        for w in values.windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(values[99] < 99.0);
    }

    #[test]
    fn test_ema_over_column_respects_offset() {
        let input = Column::new(vec![None, None, Some(10.0), Some(20.0), Some(30.0)]);
        let out = ema_over_column(&input, 9);

        assert_eq!(out.len(), 5);
        assert_eq!(out.get(0), None);
        assert_eq!(out.get(1), None);
        assert_eq!(out.get(2), Some(10.0));
        assert!(out.get(3).unwrap() > 10.0);
    }
}
