//! Ordered time series of market data rows.

use crate::bar::{Bar, ClosePoint};
use crate::interval::Interval;

/// Row storage for a series.
///
/// The fallback provider only exposes `(timestamp, close)` pairs, so a series
/// fetched through it carries `CloseOnly` rows. High/low/volume are never
/// synthesized from close; consumers that need them must check the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// Full OHLCV rows from the primary provider.
    Ohlcv(Vec<Bar>),
    /// Close-only rows from the fallback provider.
    CloseOnly(Vec<ClosePoint>),
}

/// An immutable, strictly timestamp-ordered series of market data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    interval: Interval,
    data: SeriesData,
}

impl Series {
    /// Build a series from OHLCV bars.
    ///
    /// Rows are sorted by timestamp; duplicate timestamps keep the first row.
    pub fn ohlcv(interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            interval,
            data: SeriesData::Ohlcv(bars),
        }
    }

    /// Build a close-only series from fallback provider rows.
    pub fn close_only(interval: Interval, mut points: Vec<ClosePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        Self {
            interval,
            data: SeriesData::CloseOnly(points),
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn data(&self) -> &SeriesData {
        &self.data
    }

    pub fn len(&self) -> usize {
        match &self.data {
            SeriesData::Ohlcv(bars) => bars.len(),
            SeriesData::CloseOnly(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when this series came from the close-only fallback provider.
    pub fn is_close_only(&self) -> bool {
        matches!(self.data, SeriesData::CloseOnly(_))
    }

    /// Full OHLCV rows, or `None` for a close-only series.
    pub fn bars(&self) -> Option<&[Bar]> {
        match &self.data {
            SeriesData::Ohlcv(bars) => Some(bars),
            SeriesData::CloseOnly(_) => None,
        }
    }

    /// Close price of every row, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        match &self.data {
            SeriesData::Ohlcv(bars) => bars.iter().map(|b| b.close).collect(),
            SeriesData::CloseOnly(points) => points.iter().map(|p| p.close).collect(),
        }
    }

    /// Timestamp of every row, oldest first.
    pub fn timestamps(&self) -> Vec<i64> {
        match &self.data {
            SeriesData::Ohlcv(bars) => bars.iter().map(|b| b.timestamp).collect(),
            SeriesData::CloseOnly(points) => points.iter().map(|p| p.timestamp).collect(),
        }
    }

    pub fn timestamp_at(&self, index: usize) -> Option<i64> {
        match &self.data {
            SeriesData::Ohlcv(bars) => bars.get(index).map(|b| b.timestamp),
            SeriesData::CloseOnly(points) => points.get(index).map(|p| p.timestamp),
        }
    }

    pub fn close_at(&self, index: usize) -> Option<f64> {
        match &self.data {
            SeriesData::Ohlcv(bars) => bars.get(index).map(|b| b.close),
            SeriesData::CloseOnly(points) => points.get(index).map(|p| p.close),
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            self.close_at(self.len() - 1)
        }
    }
}
