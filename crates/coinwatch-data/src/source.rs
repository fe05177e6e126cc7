//! Market data retrieval with primary/fallback reconciliation.

use std::sync::Arc;

use coinwatch_core::{Bar, ClosePoint, Interval, Series};
use coinwatch_providers::{BinanceMarket, CoinGecko, Kline};
use thiserror::Error;

use crate::registry::CoinRegistry;

/// Why no series could be produced for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Primary failed and the symbol is not in the registry, so the fallback
    /// provider cannot be addressed.
    UnknownSymbol,
    /// Both providers failed.
    BothProvidersFailed,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::UnknownSymbol => write!(f, "symbol not in registry"),
            UnavailableReason::BothProvidersFailed => write!(f, "both providers failed"),
        }
    }
}

/// Tagged failure for a fetch request. A normal, expected outcome that
/// callers branch on; batch callers skip the symbol and continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("market data unavailable for {symbol} ({interval}): {reason}")]
pub struct DataUnavailable {
    pub symbol: String,
    pub interval: Interval,
    pub reason: UnavailableReason,
}

/// Market data source: primary kline provider with registry-addressed
/// close-only fallback. Collaborators are injected, never ambient.
#[derive(Clone)]
pub struct MarketData {
    primary: BinanceMarket,
    fallback: CoinGecko,
    registry: Arc<CoinRegistry>,
    quote_suffix: String,
    vs_currency: String,
}

impl MarketData {
    pub fn new(
        primary: BinanceMarket,
        fallback: CoinGecko,
        registry: Arc<CoinRegistry>,
        quote_suffix: impl Into<String>,
        vs_currency: impl Into<String>,
    ) -> Self {
        Self {
            primary,
            fallback,
            registry,
            quote_suffix: quote_suffix.into(),
            vs_currency: vs_currency.into(),
        }
    }

    pub fn registry(&self) -> &Arc<CoinRegistry> {
        &self.registry
    }

    /// Fetch an ordered series for `symbol` at `interval`, `length` bars.
    ///
    /// The primary provider is asked first; on any failure the symbol is
    /// resolved through the registry and the fallback provider supplies a
    /// close-only series. Both failing is a value, not a fault.
    pub async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        length: u32,
    ) -> Result<Series, DataUnavailable> {
        match self.fetch_primary(symbol, interval, length).await {
            Ok(series) => Ok(series),
            Err(primary_err) => {
                tracing::warn!(
                    symbol,
                    interval = %interval,
                    error = %primary_err,
                    "primary provider failed, trying fallback"
                );
                self.fetch_fallback(symbol, interval, length).await
            }
        }
    }

    async fn fetch_primary(
        &self,
        symbol: &str,
        interval: Interval,
        length: u32,
    ) -> Result<Series, coinwatch_providers::ProviderError> {
        let pair = format!("{}{}", symbol.to_uppercase(), self.quote_suffix);
        let klines = self.primary.klines(&pair, interval, length).await?;

        if klines.is_empty() {
            return Err(coinwatch_providers::ProviderError::InvalidResponse(
                format!("no klines returned for {pair}"),
            ));
        }

        let bars: Vec<Bar> = klines.iter().map(kline_to_bar).collect();
        tracing::debug!(symbol, interval = %interval, bars = bars.len(), "primary fetch ok");
        Ok(Series::ohlcv(interval, bars))
    }

    async fn fetch_fallback(
        &self,
        symbol: &str,
        interval: Interval,
        length: u32,
    ) -> Result<Series, DataUnavailable> {
        let record = self.registry.lookup(symbol).ok_or_else(|| DataUnavailable {
            symbol: symbol.to_uppercase(),
            interval,
            reason: UnavailableReason::UnknownSymbol,
        })?;

        let days = interval.fallback_days(length);
        let chart = self
            .fallback
            .market_chart(&record.canonical_id, &self.vs_currency, days)
            .await
            .map_err(|e| {
                tracing::warn!(
                    symbol,
                    canonical_id = %record.canonical_id,
                    error = %e,
                    "fallback provider failed"
                );
                DataUnavailable {
                    symbol: symbol.to_uppercase(),
                    interval,
                    reason: UnavailableReason::BothProvidersFailed,
                }
            })?;

        let points: Vec<ClosePoint> = chart
            .close_points()
            .into_iter()
            .map(|(ts, close)| ClosePoint::new(ts, close))
            .collect();

        if points.is_empty() {
            return Err(DataUnavailable {
                symbol: symbol.to_uppercase(),
                interval,
                reason: UnavailableReason::BothProvidersFailed,
            });
        }

        tracing::debug!(
            symbol,
            interval = %interval,
            points = points.len(),
            "fallback fetch ok (close-only)"
        );
        Ok(Series::close_only(interval, points))
    }
}

/// Map a provider kline to a core bar.
fn kline_to_bar(kline: &Kline) -> Bar {
    Bar::new(
        kline.open_time,
        kline.open.to_f64(),
        kline.high.to_f64(),
        kline.low.to_f64(),
        kline.close.to_f64(),
        kline.volume.to_f64(),
    )
}
