//! Autoregressive-integrated model over a differenced close sequence.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Number of autoregressive lags.
pub const AR_ORDER: usize = 5;
/// Minimum observations before a fit is attempted.
pub const MIN_OBSERVATIONS: usize = 30;

/// Forecast failure modes. Returned, never raised as a fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// The series is too short to fit the model.
    #[error("insufficient history: need at least {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
    /// The least-squares solver rejected the design matrix.
    #[error("model fit failed: {0}")]
    FitFailed(String),
}

/// Point forecast for the periods immediately after the last observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Forecast closes in chronological order; `points.len() == horizon`.
    pub points: Vec<f64>,
    pub horizon: usize,
}

/// A fitted AR model on the differenced series.
#[derive(Debug, Clone)]
pub struct ArModel {
    /// Lag coefficients, most recent lag first.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl ArModel {
    /// Fit `order` lags plus an intercept by least squares.
    ///
    /// Solved through SVD rather than normal equations, so a rank-deficient
    /// design (e.g. a constant differenced series) still yields the
    /// minimum-norm solution instead of failing on a singular inverse.
    pub fn fit(data: &[f64], order: usize) -> Result<Self, ForecastError> {
        let n = data.len();
        if n < order + 2 {
            return Err(ForecastError::InsufficientHistory {
                required: order + 2,
                actual: n,
            });
        }

        let rows = n - order;
        let cols = order + 1;

        // Design matrix rows: [1, y_{t-1}, y_{t-2}, ..., y_{t-order}].
        let mut x_data = Vec::with_capacity(rows * cols);
        for t in order..n {
            x_data.push(1.0);
            for lag in 1..=order {
                x_data.push(data[t - lag]);
            }
        }

        let x = DMatrix::from_row_slice(rows, cols, &x_data);
        let y = DVector::from_iterator(rows, data[order..].iter().copied());

        let beta = x
            .svd(true, true)
            .solve(&y, 1e-10)
            .map_err(|e| ForecastError::FitFailed(e.to_string()))?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
        })
    }

    /// One-step-ahead prediction given the history, newest value last.
    pub fn predict_next(&self, history: &[f64]) -> f64 {
        let mut value = self.intercept;
        for (lag, coeff) in self.coefficients.iter().enumerate() {
            if let Some(&past) = history.get(history.len().wrapping_sub(lag + 1)) {
                value += coeff * past;
            }
        }
        value
    }
}

/// Forecast `horizon` closes from a close sequence.
///
/// Differences the series once, fits AR(`AR_ORDER`) on the differences,
/// iterates the recursion with predicted values fed back in, and integrates
/// from the last observed close. Deterministic for a given input.
pub fn forecast_values(closes: &[f64], horizon: usize) -> Result<Forecast, ForecastError> {
    if closes.len() < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientHistory {
            required: MIN_OBSERVATIONS,
            actual: closes.len(),
        });
    }

    let diffs = difference(closes);
    let model = ArModel::fit(&diffs, AR_ORDER)?;

    let mut extended = diffs;
    let mut forecast_diffs = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let next = model.predict_next(&extended);
        extended.push(next);
        forecast_diffs.push(next);
    }

    let last_close = closes[closes.len() - 1];
    Ok(Forecast {
        points: integrate(&forecast_diffs, last_close),
        horizon,
    })
}

/// First differences of a sequence.
fn difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Cumulative sum starting from `start` (inverse of one differencing step).
fn integrate(diffs: &[f64], start: f64) -> Vec<f64> {
    let mut level = start;
    diffs
        .iter()
        .map(|d| {
            level += d;
            level
        })
        .collect()
}
