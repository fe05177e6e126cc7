//! Signal scoring and multi-timeframe aggregation for coinwatch.
//!
//! Three layers, each pure relative to the one below:
//! - `score` - the latest enriched row → signed score + categorical labels
//! - `aggregate` - scores across a configured interval set → total score +
//!   recommendation
//! - `discovery` - coarse screening of a symbol universe, full analysis of
//!   the survivors

pub mod aggregate;
pub mod discovery;
pub mod score;

pub use aggregate::{
    AggregateResult, Aggregator, NothingScored, Recommendation, SkippedInterval,
};
pub use discovery::{
    preliminary_score, rank_candidates, Candidate, DiscoveryReport, Screener, ScreenerSettings,
};
pub use score::{
    score, score_row, BandPosition, BreakoutSignal, MomentumSignal, ScoreBreakdown, ScoreError,
    ScoreResult, SignalLabels, TrendSignal,
};
