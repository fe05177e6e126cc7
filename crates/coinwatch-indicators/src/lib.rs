//! Technical indicator pipeline for coinwatch.
//!
//! Pure transformations from a raw `Series` to an `EnrichedSeries` carrying
//! EMA, RSI, MACD, Bollinger band and stochastic oscillator columns. No I/O,
//! no shared state; safe to run in parallel across independent series.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod pipeline;
pub mod rsi;
pub mod stochastic;

pub use bollinger::{bollinger_columns, BollingerOutput};
pub use ema::{ema, ema_column, ema_over_column};
pub use macd::{macd_columns, MacdOutput};
pub use pipeline::{enrich, EnrichedSeries, IndicatorRow};
pub use rsi::rsi_column;
pub use stochastic::{stochastic_columns, StochasticOutput};
