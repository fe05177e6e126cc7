//! Batch discovery: coarse screening of a symbol universe, then full
//! multi-timeframe analysis of the best candidates.

use coinwatch_core::Interval;
use coinwatch_indicators::{enrich, IndicatorRow};
use serde::Serialize;

use crate::aggregate::{AggregateResult, Aggregator};
use crate::score::{breakout_signal, BreakoutSignal};

/// Parameters for the preliminary screening pass.
#[derive(Debug, Clone)]
pub struct ScreenerSettings {
    /// Interval the coarse pass looks at.
    pub interval: Interval,
    /// Bars fetched for the coarse pass.
    pub bars: u32,
    /// MACD divergence from its signal line considered significant.
    pub macd_divergence: f64,
    /// Minimum preliminary score to keep a symbol.
    pub score_cutoff: i32,
    /// Maximum candidates promoted to the full analysis.
    pub top_n: usize,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            interval: Interval::H4,
            bars: 200,
            macd_divergence: 1.0,
            score_cutoff: 4,
            top_n: 25,
        }
    }
}

/// A symbol with its preliminary score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub symbol: String,
    pub score: i32,
}

/// Outcome of a discovery run.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    /// Retained candidates, best preliminary score first.
    pub ranked: Vec<Candidate>,
    /// Full analysis for each retained candidate that could be aggregated.
    pub results: Vec<AggregateResult>,
    /// Symbols dropped because no data or no scorable row was available.
    pub unavailable: Vec<String>,
}

/// Coarse per-symbol score on a single interval's latest row.
///
/// Rules are deliberately blunter than the full scoring engine: any breakout
/// (either direction) +3, significant MACD divergence (either direction) +2,
/// RSI beyond 30/70 +2. Returns `None` when a required field is undefined.
pub fn preliminary_score(row: &IndicatorRow, macd_divergence: f64) -> Option<i32> {
    let ema100 = row.ema100?;
    let ema200 = row.ema200?;
    let macd = row.macd?;
    let macd_signal = row.macd_signal?;
    let rsi = row.rsi14?;

    let mut score = 0;

    if breakout_signal(row.close, ema100, ema200) != BreakoutSignal::NoBreakout {
        score += 3;
    }

    if (macd - macd_signal).abs() > macd_divergence {
        score += 2;
    }

    if rsi < 30.0 || rsi > 70.0 {
        score += 2;
    }

    Some(score)
}

/// Retain candidates at or above the cutoff, rank them by score descending
/// (stable: ties keep universe order), and truncate to the top N.
pub fn rank_candidates(candidates: Vec<Candidate>, cutoff: i32, top_n: usize) -> Vec<Candidate> {
    let mut retained: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.score >= cutoff)
        .collect();
    retained.sort_by_key(|c| std::cmp::Reverse(c.score));
    retained.truncate(top_n);
    retained
}

/// Discovery runner over a fixed symbol universe.
pub struct Screener {
    aggregator: Aggregator,
    settings: ScreenerSettings,
}

impl Screener {
    pub fn new(aggregator: Aggregator, settings: ScreenerSettings) -> Self {
        Self {
            aggregator,
            settings,
        }
    }

    /// Screen the universe and fully analyze the survivors.
    ///
    /// Symbols run sequentially; a symbol with unavailable data is reported
    /// and skipped, never fatal to the batch.
    pub async fn run(&self, universe: &[String]) -> DiscoveryReport {
        let mut candidates = Vec::with_capacity(universe.len());
        let mut unavailable = Vec::new();

        for symbol in universe {
            let series = match self
                .aggregator
                .data()
                .fetch(symbol, self.settings.interval, self.settings.bars)
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    tracing::debug!(symbol = %symbol, error = %e, "screening skipped symbol");
                    unavailable.push(symbol.to_uppercase());
                    continue;
                }
            };

            let enriched = enrich(&series);
            let Some(row) = enriched.last_row() else {
                unavailable.push(symbol.to_uppercase());
                continue;
            };

            match preliminary_score(&row, self.settings.macd_divergence) {
                Some(score) => candidates.push(Candidate {
                    symbol: symbol.to_uppercase(),
                    score,
                }),
                None => {
                    tracing::debug!(symbol = %symbol, "screening row not fully defined");
                    unavailable.push(symbol.to_uppercase());
                }
            }
        }

        let ranked = rank_candidates(candidates, self.settings.score_cutoff, self.settings.top_n);

        let mut results = Vec::with_capacity(ranked.len());
        for candidate in &ranked {
            match self.aggregator.analyze(&candidate.symbol).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::debug!(symbol = %candidate.symbol, error = %e, "full analysis failed");
                    unavailable.push(candidate.symbol.clone());
                }
            }
        }

        DiscoveryReport {
            ranked,
            results,
            unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(symbol: &str, score: i32) -> Candidate {
        Candidate {
            symbol: symbol.to_string(),
            score,
        }
    }

    fn row(close: f64) -> IndicatorRow {
        IndicatorRow {
            index: 0,
            timestamp: 0,
            close,
            ema12: Some(100.0),
            ema26: Some(100.0),
            ema100: Some(100.0),
            ema200: Some(101.0),
            rsi14: Some(50.0),
            macd: Some(0.0),
            macd_signal: Some(0.0),
            bb_upper: Some(110.0),
            bb_lower: Some(90.0),
            stoch_k: None,
            stoch_d: None,
        }
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let ranked = rank_candidates(
            vec![candidate("A", 5), candidate("B", 7), candidate("C", 5)],
            4,
            25,
        );
        let symbols: Vec<&str> = ranked.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_cutoff_and_truncation() {
        let ranked = rank_candidates(
            vec![
                candidate("A", 3),
                candidate("B", 7),
                candidate("C", 4),
                candidate("D", 5),
            ],
            4,
            2,
        );
        let symbols: Vec<&str> = ranked.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "D"]);
    }

    #[test]
    fn test_preliminary_score_breakout_both_directions() {
        // Bullish breakout: close above both long EMAs.
        let mut r = row(120.0);
        assert_eq!(preliminary_score(&r, 1.0), Some(3));

        // Bearish breakout also scores +3 in the coarse pass.
        r.close = 80.0;
        assert_eq!(preliminary_score(&r, 1.0), Some(3));

        // Between the EMAs: no breakout points.
        r.close = 100.5;
        assert_eq!(preliminary_score(&r, 1.0), Some(0));
    }

    #[test]
    fn test_preliminary_score_macd_and_rsi() {
        let mut r = row(100.5);
        r.macd = Some(2.5);
        r.macd_signal = Some(0.0);
        r.rsi14 = Some(25.0);
        // MACD divergence +2, RSI extreme +2.
        assert_eq!(preliminary_score(&r, 1.0), Some(4));

        // Divergence exactly at the threshold does not count.
        r.macd = Some(1.0);
        r.rsi14 = Some(75.0);
        assert_eq!(preliminary_score(&r, 1.0), Some(2));
    }

    #[test]
    fn test_preliminary_score_requires_defined_fields() {
        let mut r = row(100.0);
        r.rsi14 = None;
        assert_eq!(preliminary_score(&r, 1.0), None);
    }
}
