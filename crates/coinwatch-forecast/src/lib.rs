//! Short-horizon close price forecasting for coinwatch.
//!
//! Fits an autoregressive model (5 lags, one differencing step, no moving
//! average terms) to a close series and emits point forecasts for the
//! periods immediately following the last observation.

pub mod arima;

use coinwatch_core::Series;

pub use arima::{forecast_values, ArModel, Forecast, ForecastError, AR_ORDER, MIN_OBSERVATIONS};

/// Forecast the next `horizon` closes of a series.
///
/// Works for both full OHLCV and close-only series; only closes are
/// consumed. Fewer than [`MIN_OBSERVATIONS`] rows is an
/// [`ForecastError::InsufficientHistory`] value, not a fault.
pub fn forecast_closes(series: &Series, horizon: usize) -> Result<Forecast, ForecastError> {
    forecast_values(&series.closes(), horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinwatch_core::{ClosePoint, Interval};

    #[test]
    fn test_forecast_from_close_only_series() {
        let points: Vec<ClosePoint> = (0..40)
            .map(|i| ClosePoint::new(i as i64 * 86_400_000, 100.0 + i as f64 * 0.5))
            .collect();
        let series = Series::close_only(Interval::D1, points);

        let forecast = forecast_closes(&series, 5).unwrap();
        assert_eq!(forecast.points.len(), 5);
        // Forecasts follow the last observation chronologically and keep
        // the series' drift.
        assert!(forecast.points[0] > 100.0 + 39.0 * 0.5 - 1.0);
    }

    #[test]
    fn test_short_series_is_a_value_not_a_panic() {
        let points: Vec<ClosePoint> = (0..10)
            .map(|i| ClosePoint::new(i as i64, 100.0))
            .collect();
        let series = Series::close_only(Interval::D1, points);

        match forecast_closes(&series, 5) {
            Err(ForecastError::InsufficientHistory { required, actual }) => {
                assert_eq!(required, 30);
                assert_eq!(actual, 10);
            }
            other => panic!("expected InsufficientHistory, got {other:?}"),
        }
    }
}
