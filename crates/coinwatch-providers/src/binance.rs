//! Primary market data provider: Binance-style kline endpoint.

use coinwatch_core::Interval;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::RestClient;
use crate::error::Result;

/// Decimal wrapper that deserializes from either a JSON string or number.
///
/// The kline endpoint encodes prices as strings; parsing through `Decimal`
/// avoids silently accepting garbage the way a lossy float parse would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireDecimal(pub Decimal);

impl WireDecimal {
    /// Lossy conversion for the analysis pipeline.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl<'de> Deserialize<'de> for WireDecimal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(f64),
        }

        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s
                .parse::<Decimal>()
                .map(WireDecimal)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {e}"))),
            StringOrNumber::Number(n) => Decimal::try_from(n)
                .map(WireDecimal)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {e}"))),
        }
    }
}

impl Serialize for WireDecimal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl std::fmt::Display for WireDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One kline row.
///
/// The endpoint returns each row as a heterogeneous JSON array; only the
/// first six fields are required, trailing fields (close time, quote volume,
/// trade count, ...) are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Kline {
    /// Open time in milliseconds.
    pub open_time: i64,
    /// Open price.
    pub open: WireDecimal,
    /// High price.
    pub high: WireDecimal,
    /// Low price.
    pub low: WireDecimal,
    /// Close price.
    pub close: WireDecimal,
    /// Base asset volume.
    pub volume: WireDecimal,
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let arr: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;

        if arr.len() < 6 {
            return Err(D::Error::custom("kline array too short"));
        }

        let parse_decimal = |v: &serde_json::Value| -> std::result::Result<WireDecimal, D::Error> {
            match v {
                serde_json::Value::String(s) => s
                    .parse::<Decimal>()
                    .map(WireDecimal)
                    .map_err(|e| D::Error::custom(format!("invalid decimal: {e}"))),
                serde_json::Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| D::Error::custom("invalid number"))
                    .and_then(|f| {
                        Decimal::try_from(f)
                            .map(WireDecimal)
                            .map_err(|e| D::Error::custom(format!("invalid decimal: {e}")))
                    }),
                _ => Err(D::Error::custom("expected string or number")),
            }
        };

        let open_time = arr[0]
            .as_i64()
            .ok_or_else(|| D::Error::custom("expected integer open time"))?;

        Ok(Kline {
            open_time,
            open: parse_decimal(&arr[1])?,
            high: parse_decimal(&arr[2])?,
            low: parse_decimal(&arr[3])?,
            close: parse_decimal(&arr[4])?,
            volume: parse_decimal(&arr[5])?,
        })
    }
}

/// Exchange information response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    /// Trading symbols.
    pub symbols: Vec<SymbolInfo>,
}

/// One tradable symbol from the exchange info endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Pair name (e.g., "BTCUSDT").
    pub symbol: String,
    /// Trading status.
    #[serde(default)]
    pub status: String,
    /// Base asset (e.g., "BTC").
    pub base_asset: String,
    /// Quote asset (e.g., "USDT").
    pub quote_asset: String,
}

/// Kline endpoint client for the primary provider.
#[derive(Debug, Clone)]
pub struct BinanceMarket {
    client: RestClient,
}

impl BinanceMarket {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch exchange information (tradable symbols).
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.client.get_json("/api/v3/exchangeInfo", &[]).await
    }

    /// Fetch klines for a trading pair.
    ///
    /// # Arguments
    /// * `pair` - Trading pair with quote suffix (e.g., "BTCUSDT")
    /// * `interval` - Kline interval token
    /// * `limit` - Number of bars (max 1000)
    pub async fn klines(&self, pair: &str, interval: Interval, limit: u32) -> Result<Vec<Kline>> {
        let query = [
            ("symbol", pair.to_uppercase()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        self.client.get_json("/api/v3/klines", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kline_from_array() {
        let json = r#"[
            1700000000000,
            "37000.10", "37500.00", "36800.50", "37250.25", "1234.567",
            1700003599999, "45000000.0", 98765, "600.0", "22000000.0", "0"
        ]"#;

        let kline: Kline = serde_json::from_str(json).unwrap();
        assert_eq!(kline.open_time, 1_700_000_000_000);
        assert_eq!(kline.open.to_f64(), 37000.10);
        assert_eq!(kline.high.to_f64(), 37500.00);
        assert_eq!(kline.low.to_f64(), 36800.50);
        assert_eq!(kline.close.to_f64(), 37250.25);
        assert_eq!(kline.volume.to_f64(), 1234.567);
    }

    #[test]
    fn test_kline_minimum_six_fields() {
        let json = r#"[1700000000000, "1", "2", "0.5", "1.5", "10"]"#;
        let kline: Kline = serde_json::from_str(json).unwrap();
        assert_eq!(kline.close.to_f64(), 1.5);

        let short = r#"[1700000000000, "1", "2", "0.5", "1.5"]"#;
        assert!(serde_json::from_str::<Kline>(short).is_err());
    }

    #[test]
    fn test_exchange_info_symbols() {
        let json = r#"{
            "timezone": "UTC",
            "serverTime": 1700000000000,
            "symbols": [
                {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "ETHBTC", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "BTC"}
            ]
        }"#;

        let info: ExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.symbols.len(), 2);
        assert_eq!(info.symbols[0].base_asset, "BTC");
        assert_eq!(info.symbols[1].quote_asset, "BTC");
    }

    #[test]
    fn test_kline_numeric_fields() {
        // Some mirrors return plain numbers instead of strings.
        let json = r#"[1700000000000, 1.0, 2.0, 0.5, 1.5, 10.0]"#;
        let kline: Kline = serde_json::from_str(json).unwrap();
        assert_eq!(kline.open.to_f64(), 1.0);
        assert_eq!(kline.volume.to_f64(), 10.0);
    }
}
