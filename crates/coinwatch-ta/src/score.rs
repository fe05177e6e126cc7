//! Signal scoring over the latest row of an enriched series.

use coinwatch_core::Interval;
use coinwatch_indicators::{EnrichedSeries, IndicatorRow};
use serde::Serialize;
use thiserror::Error;

/// Why an interval could not be scored. Callers skip the interval; this is
/// not fatal for a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// The named indicator has no value on the latest row (insufficient
    /// lookback, or a flat stochastic window on full OHLCV data).
    #[error("indicator '{0}' is undefined on the latest row")]
    Undefined(&'static str),
    /// The series has no rows at all.
    #[error("series is empty")]
    EmptySeries,
}

/// Short-term trend from the EMA 12/26 crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// Momentum from the MACD line vs its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MomentumSignal {
    Bullish,
    Bearish,
}

/// Position of the close relative to the Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandPosition {
    Oversold,
    Overbought,
    InsideBands,
}

/// Close relative to both long-term EMAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakoutSignal {
    Bullish,
    Bearish,
    NoBreakout,
}

/// Categorical labels derived alongside the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalLabels {
    pub trend: TrendSignal,
    pub momentum: MomentumSignal,
    pub volatility: BandPosition,
    pub breakout: BreakoutSignal,
}

/// Per-component contributions to the score.
///
/// `stochastic` is `None` when the oscillator is structurally unavailable
/// (close-only fallback data); it then contributes nothing to the sum. All
/// other components are always present in a successful score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub rsi: i32,
    pub macd: i32,
    pub ema_cross: i32,
    pub long_term: i32,
    pub bollinger: i32,
    pub stochastic: Option<i32>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.rsi
            + self.macd
            + self.ema_cross
            + self.long_term
            + self.bollinger
            + self.stochastic.unwrap_or(0)
    }
}

/// The score for one interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub interval: Interval,
    pub score: i32,
    pub labels: SignalLabels,
    pub breakdown: ScoreBreakdown,
}

/// Score the latest row of an enriched series.
pub fn score(enriched: &EnrichedSeries) -> Result<ScoreResult, ScoreError> {
    let row = enriched.last_row().ok_or(ScoreError::EmptySeries)?;
    score_row(&row, enriched.is_close_only(), enriched.interval())
}

/// Score a single indicator row.
///
/// `close_only` marks rows from fallback-sourced series, where the
/// stochastic oscillator is structurally absent and is skipped rather than
/// treated as an error.
pub fn score_row(
    row: &IndicatorRow,
    close_only: bool,
    interval: Interval,
) -> Result<ScoreResult, ScoreError> {
    let rsi = row.rsi14.ok_or(ScoreError::Undefined("rsi14"))?;
    let macd = row.macd.ok_or(ScoreError::Undefined("macd"))?;
    let macd_signal = row.macd_signal.ok_or(ScoreError::Undefined("macd_signal"))?;
    let ema12 = row.ema12.ok_or(ScoreError::Undefined("ema12"))?;
    let ema26 = row.ema26.ok_or(ScoreError::Undefined("ema26"))?;
    let ema100 = row.ema100.ok_or(ScoreError::Undefined("ema100"))?;
    let ema200 = row.ema200.ok_or(ScoreError::Undefined("ema200"))?;
    let bb_upper = row.bb_upper.ok_or(ScoreError::Undefined("bb_upper"))?;
    let bb_lower = row.bb_lower.ok_or(ScoreError::Undefined("bb_lower"))?;

    let stochastic = if close_only {
        None
    } else {
        let k = row.stoch_k.ok_or(ScoreError::Undefined("stoch_k"))?;
        let d = row.stoch_d.ok_or(ScoreError::Undefined("stoch_d"))?;
        Some(stochastic_component(k, d))
    };

    let breakdown = ScoreBreakdown {
        rsi: rsi_component(rsi),
        macd: if macd > macd_signal { 2 } else { -2 },
        ema_cross: if ema12 > ema26 { 2 } else { -2 },
        long_term: if ema100 > ema200 { 1 } else { -1 },
        bollinger: bollinger_component(row.close, bb_upper, bb_lower),
        stochastic,
    };

    let labels = SignalLabels {
        trend: if ema12 > ema26 {
            TrendSignal::Bullish
        } else if ema12 < ema26 {
            TrendSignal::Bearish
        } else {
            TrendSignal::Neutral
        },
        momentum: if macd > macd_signal {
            MomentumSignal::Bullish
        } else {
            MomentumSignal::Bearish
        },
        volatility: if row.close < bb_lower {
            BandPosition::Oversold
        } else if row.close > bb_upper {
            BandPosition::Overbought
        } else {
            BandPosition::InsideBands
        },
        breakout: breakout_signal(row.close, ema100, ema200),
    };

    Ok(ScoreResult {
        interval,
        score: breakdown.total(),
        labels,
        breakdown,
    })
}

fn rsi_component(rsi: f64) -> i32 {
    if rsi < 30.0 {
        2
    } else if rsi > 70.0 {
        -2
    } else if rsi < 50.0 {
        1
    } else if rsi > 50.0 {
        -1
    } else {
        0
    }
}

fn bollinger_component(close: f64, upper: f64, lower: f64) -> i32 {
    if close < lower {
        2
    } else if close > upper {
        -2
    } else {
        0
    }
}

fn stochastic_component(k: f64, d: f64) -> i32 {
    if k < 20.0 && d < 20.0 && k > d {
        // Bullish crossover in the oversold zone.
        2
    } else if k > 80.0 && d > 80.0 && k < d {
        // Bearish crossover in the overbought zone.
        -2
    } else {
        0
    }
}

/// Breakout state: close decisively above or below both long-term EMAs.
pub fn breakout_signal(close: f64, ema100: f64, ema200: f64) -> BreakoutSignal {
    if close > ema100 && close > ema200 {
        BreakoutSignal::Bullish
    } else if close < ema100 && close < ema200 {
        BreakoutSignal::Bearish
    } else {
        BreakoutSignal::NoBreakout
    }
}
