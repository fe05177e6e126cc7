//! The indicator pipeline: raw series in, enriched series out.

use coinwatch_core::{Column, Interval, Series};

use crate::bollinger::bollinger_columns;
use crate::ema::ema_column;
use crate::macd::macd_columns;
use crate::rsi::rsi_column;
use crate::stochastic::stochastic_columns;

/// Fixed indicator parameters used across the pipeline.
pub const EMA_SPANS: [usize; 4] = [12, 26, 100, 200];
pub const RSI_PERIOD: usize = 14;
pub const MACD_SIGNAL_SPAN: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;

/// A series together with its computed indicator columns.
///
/// Every column has exactly the series' length; leading `None` entries mark
/// rows where the lookback is not yet available. For a close-only series the
/// stochastic columns are entirely undefined because the high/low inputs do
/// not exist — they are never synthesized from close.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    series: Series,
    pub ema12: Column,
    pub ema26: Column,
    pub ema100: Column,
    pub ema200: Column,
    pub rsi14: Column,
    pub macd: Column,
    pub macd_signal: Column,
    pub bb_mid: Column,
    pub bb_upper: Column,
    pub bb_lower: Column,
    pub stoch_k: Column,
    pub stoch_d: Column,
}

/// One row of an enriched series, as consumed by the scoring layer.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorRow {
    pub index: usize,
    pub timestamp: i64,
    pub close: f64,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub ema100: Option<f64>,
    pub ema200: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
}

/// Compute all indicator columns for a series.
///
/// Pure and deterministic; the input is copied into the result, never
/// mutated. Close-based indicators (EMA, RSI, MACD, Bollinger) are computed
/// for any series; the stochastic oscillator additionally needs OHLCV rows.
pub fn enrich(series: &Series) -> EnrichedSeries {
    let closes = series.closes();
    let len = closes.len();

    let ema12 = ema_column(&closes, EMA_SPANS[0]);
    let ema26 = ema_column(&closes, EMA_SPANS[1]);
    let ema100 = ema_column(&closes, EMA_SPANS[2]);
    let ema200 = ema_column(&closes, EMA_SPANS[3]);
    let rsi14 = rsi_column(&closes, RSI_PERIOD);
    let macd_out = macd_columns(&closes, EMA_SPANS[0], EMA_SPANS[1], MACD_SIGNAL_SPAN);
    let bb = bollinger_columns(&closes, BOLLINGER_PERIOD, BOLLINGER_K);

    let (stoch_k, stoch_d) = match series.bars() {
        Some(bars) => {
            let out = stochastic_columns(bars, STOCH_K_PERIOD, STOCH_D_PERIOD);
            (out.k, out.d)
        }
        // Close-only series: high/low are unavailable, so the oscillator is
        // structurally undefined at every row.
        None => (Column::undefined(len), Column::undefined(len)),
    };

    EnrichedSeries {
        series: series.clone(),
        ema12,
        ema26,
        ema100,
        ema200,
        rsi14,
        macd: macd_out.macd,
        macd_signal: macd_out.signal,
        bb_mid: bb.mid,
        bb_upper: bb.upper,
        bb_lower: bb.lower,
        stoch_k,
        stoch_d,
    }
}

impl EnrichedSeries {
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn interval(&self) -> Interval {
        self.series.interval()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn is_close_only(&self) -> bool {
        self.series.is_close_only()
    }

    /// Snapshot of every column at the given row.
    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        let timestamp = self.series.timestamp_at(index)?;
        let close = self.series.close_at(index)?;

        Some(IndicatorRow {
            index,
            timestamp,
            close,
            ema12: self.ema12.get(index),
            ema26: self.ema26.get(index),
            ema100: self.ema100.get(index),
            ema200: self.ema200.get(index),
            rsi14: self.rsi14.get(index),
            macd: self.macd.get(index),
            macd_signal: self.macd_signal.get(index),
            bb_upper: self.bb_upper.get(index),
            bb_lower: self.bb_lower.get(index),
            stoch_k: self.stoch_k.get(index),
            stoch_d: self.stoch_d.get(index),
        })
    }

    /// Snapshot of the newest row.
    pub fn last_row(&self) -> Option<IndicatorRow> {
        if self.is_empty() {
            None
        } else {
            self.row(self.len() - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinwatch_core::{Bar, ClosePoint};

    fn ohlcv_series(closes: &[f64]) -> Series {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 3_600_000, c, c + 1.0, c - 1.0, c, 100.0))
            .collect();
        Series::ohlcv(Interval::H1, bars)
    }

    #[test]
    fn test_columns_aligned_with_series() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let series = ohlcv_series(&closes);
        let enriched = enrich(&series);

        assert_eq!(enriched.len(), 250);
        for col in [
            &enriched.ema12,
            &enriched.ema26,
            &enriched.ema100,
            &enriched.ema200,
            &enriched.rsi14,
            &enriched.macd,
            &enriched.macd_signal,
            &enriched.bb_mid,
            &enriched.bb_upper,
            &enriched.bb_lower,
            &enriched.stoch_k,
            &enriched.stoch_d,
        ] {
            assert_eq!(col.len(), 250);
        }
    }

    #[test]
    fn test_input_series_untouched() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let series = ohlcv_series(&closes);
        let before = series.clone();
        let _ = enrich(&series);
        assert_eq!(series, before);
    }

    #[test]
    fn test_macd_identity_on_enriched_rows() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.5).cos() * 4.0).collect();
        let enriched = enrich(&ohlcv_series(&closes));

        for i in 0..80 {
            let row = enriched.row(i).unwrap();
            let (Some(macd), Some(e12), Some(e26)) = (row.macd, row.ema12, row.ema26) else {
                panic!("row {i} should be fully defined");
            };
            assert!((macd - (e12 - e26)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_close_only_series_has_no_stochastic() {
        let points: Vec<ClosePoint> = (0..60)
            .map(|i| ClosePoint::new(i as i64 * 86_400_000, 100.0 + i as f64))
            .collect();
        let series = Series::close_only(Interval::D1, points);
        let enriched = enrich(&series);

        assert!(enriched.is_close_only());
        assert_eq!(enriched.stoch_k.iter_defined().count(), 0);
        assert_eq!(enriched.stoch_d.iter_defined().count(), 0);
        // Close-based indicators still compute.
        let last = enriched.last_row().unwrap();
        assert!(last.ema12.is_some());
        assert!(last.rsi14.is_some());
        assert!(last.bb_upper.is_some());
    }

    #[test]
    fn test_short_series_rows_partially_defined() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let enriched = enrich(&ohlcv_series(&closes));
        let last = enriched.last_row().unwrap();

        // EMA/MACD are defined from row 0; 14/20-lookback fields are not yet.
        assert!(last.ema200.is_some());
        assert!(last.macd_signal.is_some());
        assert_eq!(last.rsi14, None);
        assert_eq!(last.bb_upper, None);
        assert_eq!(last.stoch_k, None);
    }
}
