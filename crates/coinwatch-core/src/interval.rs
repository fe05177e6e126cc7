//! Candle interval tokens shared by providers and analysis.

use serde::{Deserialize, Serialize};

/// Candle interval supported by the analysis pipeline.
///
/// The serde/display tokens match the primary provider's kline interval
/// strings, so the enum can be sent on the wire as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 hour
    #[serde(rename = "1h")]
    H1,
    /// 4 hours
    #[serde(rename = "4h")]
    H4,
    /// 12 hours
    #[serde(rename = "12h")]
    H12,
    /// 1 day
    #[serde(rename = "1d")]
    D1,
}

impl Interval {
    /// Provider token for this interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::H12 => "12h",
            Interval::D1 => "1d",
        }
    }

    /// Parse a provider token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(Interval::H1),
            "4h" => Some(Interval::H4),
            "12h" => Some(Interval::H12),
            "1d" => Some(Interval::D1),
            _ => None,
        }
    }

    /// All supported intervals, shortest first.
    pub fn all() -> &'static [Interval] {
        &[Interval::H1, Interval::H4, Interval::H12, Interval::D1]
    }

    /// Duration of one bar in milliseconds.
    pub fn millis(&self) -> i64 {
        match self {
            Interval::H1 => 60 * 60 * 1000,
            Interval::H4 => 4 * 60 * 60 * 1000,
            Interval::H12 => 12 * 60 * 60 * 1000,
            Interval::D1 => 24 * 60 * 60 * 1000,
        }
    }

    /// Convert a bar count at this interval into the "days of history"
    /// parameter the fallback provider expects. Integer division, minimum 1.
    pub fn fallback_days(&self, length: u32) -> u32 {
        let days = match self {
            Interval::H1 => length / 24,
            Interval::H4 => length / 6,
            Interval::H12 => length / 2,
            Interval::D1 => length,
        };
        days.max(1)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s).ok_or_else(|| format!("unknown interval '{s}' (expected 1h, 4h, 12h or 1d)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_tokens() {
        for &interval in Interval::all() {
            assert_eq!(Interval::parse(interval.as_str()), Some(interval));
        }
        assert_eq!(Interval::parse("15m"), None);
    }

    #[test]
    fn test_fallback_days_divisors() {
        assert_eq!(Interval::H1.fallback_days(200), 8); // 200 / 24
        assert_eq!(Interval::H4.fallback_days(200), 33); // 200 / 6
        assert_eq!(Interval::H12.fallback_days(200), 100);
        assert_eq!(Interval::D1.fallback_days(200), 200);
    }

    #[test]
    fn test_fallback_days_minimum_one() {
        assert_eq!(Interval::H1.fallback_days(5), 1);
        assert_eq!(Interval::D1.fallback_days(0), 1);
    }
}
