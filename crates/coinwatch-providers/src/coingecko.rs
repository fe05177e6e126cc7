//! Secondary market data provider: CoinGecko-style market chart endpoint.

use serde::{Deserialize, Serialize};

use crate::client::RestClient;
use crate::error::Result;

/// Market chart response.
///
/// Only the `prices` field is consumed; the generic endpoint does not expose
/// OHLC or per-bar volume, which is why series sourced here are close-only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketChart {
    /// `[timestamp_ms, price]` pairs, oldest first.
    pub prices: Vec<(f64, f64)>,
}

impl MarketChart {
    /// Convert raw pairs to `(timestamp_ms, close)` rows.
    pub fn close_points(&self) -> Vec<(i64, f64)> {
        self.prices
            .iter()
            .map(|&(ts, price)| (ts as i64, price))
            .collect()
    }
}

/// One asset listing entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoinListEntry {
    /// Canonical asset id (e.g., "bitcoin").
    pub id: String,
    /// Ticker symbol, lowercased by the provider.
    pub symbol: String,
    /// Display name.
    pub name: String,
}

/// Client for the secondary provider.
#[derive(Debug, Clone)]
pub struct CoinGecko {
    client: RestClient,
}

impl CoinGecko {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch the close-price history for an asset.
    ///
    /// # Arguments
    /// * `id` - Canonical asset id (e.g., "bitcoin")
    /// * `vs_currency` - Quote currency (e.g., "usd")
    /// * `days` - Days of history
    pub async fn market_chart(
        &self,
        id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketChart> {
        let path = format!("/api/v3/coins/{id}/market_chart");
        let query = [
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
            ("interval", "daily".to_string()),
        ];

        self.client.get_json(&path, &query).await
    }

    /// Fetch the full asset listing. Used as the supplementary source when
    /// rebuilding the coin registry.
    pub async fn coins_list(&self) -> Result<Vec<CoinListEntry>> {
        self.client.get_json("/api/v3/coins/list", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_close_points() {
        let json = r#"{
            "prices": [[1700000000000.0, 37000.5], [1700086400000.0, 37500.25]],
            "market_caps": [],
            "total_volumes": []
        }"#;

        let chart: MarketChart = serde_json::from_str(json).unwrap();
        let points = chart.close_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (1_700_000_000_000, 37000.5));
        assert_eq!(points[1], (1_700_086_400_000, 37500.25));
    }

    #[test]
    fn test_coin_list_entry() {
        let json = r#"[{"id": "bitcoin", "symbol": "btc", "name": "Bitcoin"}]"#;
        let list: Vec<CoinListEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(list[0].id, "bitcoin");
        assert_eq!(list[0].symbol, "btc");
    }
}
