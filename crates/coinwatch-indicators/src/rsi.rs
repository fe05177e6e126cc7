//! Relative strength index.

use coinwatch_core::Column;

/// Guard against division by zero on all-gain windows.
const EPSILON: f64 = 1e-9;

/// RSI over a close sequence with a simple rolling mean of gains/losses.
///
/// Undefined until `period` deltas exist, i.e. the first `period` rows are
/// `None`.
pub fn rsi_column(closes: &[f64], period: usize) -> Column {
    let len = closes.len();
    if len < 2 || period == 0 {
        return Column::undefined(len);
    }

    // Delta i corresponds to row i + 1.
    let mut gains = Vec::with_capacity(len - 1);
    let mut losses = Vec::with_capacity(len - 1);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut values: Vec<Option<f64>> = vec![None; len];
    for row in period..len {
        let window_start = row - period;
        let avg_gain: f64 = gains[window_start..row].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[window_start..row].iter().sum::<f64>() / period as f64;

        let rs = avg_gain / (avg_loss + EPSILON);
        values[row] = Some(100.0 - 100.0 / (1.0 + rs));
    }

    Column::new(values)
}
