//! Multi-timeframe aggregation of per-interval scores.

use coinwatch_core::Interval;
use coinwatch_data::MarketData;
use coinwatch_indicators::enrich;
use serde::Serialize;
use thiserror::Error;

use crate::score::{score, ScoreResult};

/// Overall recommendation derived from the summed interval scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// Map a total score to a recommendation. Pure; the only state is the
    /// argument.
    pub fn from_total(total: i32) -> Self {
        match total {
            t if t >= 8 => Recommendation::StrongBuy,
            t if t >= 4 => Recommendation::Buy,
            t if t > -4 => Recommendation::Neutral,
            t if t > -8 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Neutral => "Neutral",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An interval dropped from the aggregate, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInterval {
    pub interval: Interval,
    pub reason: String,
}

/// Aggregated analysis for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub symbol: String,
    pub per_interval: Vec<ScoreResult>,
    pub skipped: Vec<SkippedInterval>,
    pub total_score: i32,
    pub recommendation: Recommendation,
}

/// Aggregation failure: not a single interval could be scored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no interval could be scored for {symbol}")]
pub struct NothingScored {
    pub symbol: String,
    pub skipped: Vec<SkippedInterval>,
}

/// Runs fetch → enrich → score across a configured set of intervals.
///
/// Collaborators arrive through the constructor; per-interval failures are
/// collected, not propagated, so one bad interval never poisons the batch.
#[derive(Clone)]
pub struct Aggregator {
    data: MarketData,
    intervals: Vec<Interval>,
    bars: u32,
}

impl Aggregator {
    pub fn new(data: MarketData, intervals: Vec<Interval>, bars: u32) -> Self {
        Self {
            data,
            intervals,
            bars,
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn data(&self) -> &MarketData {
        &self.data
    }

    /// Analyze one symbol across all configured intervals.
    ///
    /// Intervals are fetched sequentially, in configuration order, to stay
    /// inside upstream rate limits. The result orders scored intervals the
    /// same way.
    pub async fn analyze(&self, symbol: &str) -> Result<AggregateResult, NothingScored> {
        let mut per_interval = Vec::with_capacity(self.intervals.len());
        let mut skipped = Vec::new();

        for &interval in &self.intervals {
            match self.data.fetch(symbol, interval, self.bars).await {
                Ok(series) => {
                    let enriched = enrich(&series);
                    match score(&enriched) {
                        Ok(result) => per_interval.push(result),
                        Err(e) => {
                            tracing::debug!(symbol, interval = %interval, error = %e, "interval not scorable");
                            skipped.push(SkippedInterval {
                                interval,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(symbol, interval = %interval, error = %e, "interval unavailable");
                    skipped.push(SkippedInterval {
                        interval,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if per_interval.is_empty() {
            return Err(NothingScored {
                symbol: symbol.to_uppercase(),
                skipped,
            });
        }

        let total_score: i32 = per_interval.iter().map(|r| r.score).sum();

        Ok(AggregateResult {
            symbol: symbol.to_uppercase(),
            per_interval,
            skipped,
            total_score,
            recommendation: Recommendation::from_total(total_score),
        })
    }
}
